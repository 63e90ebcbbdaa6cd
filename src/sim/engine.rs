//! Dispatch simulator: generation profiles, battery policy, gating, and thermal pool.

use tracing::{debug, info};

use crate::devices::{
    ChpUnit, DeviceContext, Generator, SolarArray, StoragePool, WindSampler, WindTurbine,
    sampler_for,
};

use super::clock::SimClock;
use super::dispatch::{DispatchInput, DispatchPolicy, Dispatcher};
use super::error::SimError;
use super::ramp::apply_ramp;
use super::stats::percentile;
use super::types::{
    DispatchMode, SimulationConfig, SimulationResult, StepRecord, ThermalRecord,
};

/// Demand percentile above which peak shaving discharges.
pub const PEAK_SHAVING_PERCENTILE: f32 = 80.0;

/// Per-step generator outputs computed before dispatch.
#[derive(Debug, Clone, Default)]
pub struct GenerationProfiles {
    pub solar_kw: Vec<f32>,
    pub wind_kw: Vec<f32>,
    pub chp_kw: Vec<f32>,
}

impl GenerationProfiles {
    /// Samples every enabled generator once per step and applies the ramp
    /// filter to the profiles selected by `config.ramp`.
    ///
    /// Disabled generators produce an all-zero profile.
    pub fn build(config: &SimulationConfig, sampler: &mut dyn WindSampler) -> Self {
        let n = config.step_count;
        let mut solar = SolarArray::new(config.solar_capacity);
        let mut wind = WindTurbine::new(config.wind_capacity, sampler);
        let mut chp = ChpUnit::new(config.chp_capacity);

        let mut profiles = Self {
            solar_kw: Vec::with_capacity(n),
            wind_kw: Vec::with_capacity(n),
            chp_kw: Vec::with_capacity(n),
        };

        let mut clock = SimClock::new(config.start, config.step_duration, n);
        clock.run(|_, _, hour| {
            let ctx = DeviceContext::new(hour);
            profiles.solar_kw.push(sample(&mut solar, &ctx, config.use_solar));
            profiles.wind_kw.push(sample(&mut wind, &ctx, config.use_wind));
            profiles.chp_kw.push(sample(&mut chp, &ctx, config.use_chp));
        });

        let rate = config.ramp_rate;
        if config.ramp.solar {
            profiles.solar_kw = apply_ramp(&profiles.solar_kw, rate);
        }
        if config.ramp.wind {
            profiles.wind_kw = apply_ramp(&profiles.wind_kw, rate);
        }
        if config.ramp.chp {
            profiles.chp_kw = apply_ramp(&profiles.chp_kw, rate);
        }

        log_profile(&solar, config.use_solar, &profiles.solar_kw);
        log_profile(&wind, config.use_wind, &profiles.wind_kw);
        log_profile(&chp, config.use_chp, &profiles.chp_kw);
        profiles
    }
}

fn sample(device: &mut impl Generator, ctx: &DeviceContext, enabled: bool) -> f32 {
    if enabled { device.power_kw(ctx) } else { 0.0 }
}

fn log_profile(device: &impl Generator, enabled: bool, profile_kw: &[f32]) {
    let peak_kw = profile_kw.iter().copied().fold(0.0_f32, f32::max);
    debug!(
        device = device.device_type(),
        enabled,
        peak_kw,
        "generation profile built"
    );
}

/// Runs a full dispatch simulation with the seeded sampler for `config.wind_model`.
///
/// # Errors
///
/// Returns the first validation failure of `config`; no step runs in that case.
pub fn simulate(config: &SimulationConfig) -> Result<SimulationResult, SimError> {
    let mut sampler = sampler_for(config.wind_model, config.seed);
    simulate_with_sampler(config, sampler.as_mut())
}

/// Runs a full dispatch simulation drawing wind from `sampler`.
///
/// Each call starts with empty storage and an inactive generation gate.
/// Steps run strictly in order since each depends on the previous storage
/// level and gate state.
///
/// # Errors
///
/// Returns the first validation failure of `config`; no step runs in that case.
pub fn simulate_with_sampler(
    config: &SimulationConfig,
    sampler: &mut dyn WindSampler,
) -> Result<SimulationResult, SimError> {
    config.validate()?;

    info!(
        steps = config.step_count,
        step_duration = %config.step_duration,
        mode = ?config.dispatch_mode,
        gating = config.enable_gating,
        thermal = config.thermal_enabled(),
        "starting dispatch simulation"
    );

    let profiles = GenerationProfiles::build(config, sampler);
    let dt = config.dt_hours();

    let peak_threshold_kw = match config.dispatch_mode {
        DispatchMode::PeakShaving => percentile(&config.demand_series, PEAK_SHAVING_PERCENTILE),
        DispatchMode::Default => None,
    };
    if let Some(threshold) = peak_threshold_kw {
        debug!(threshold_kw = threshold, "peak-shaving threshold");
    }
    let dispatcher = Dispatcher::for_mode(
        config.dispatch_mode,
        peak_threshold_kw.unwrap_or(f32::INFINITY),
    );

    let mut battery = StoragePool::new(config.battery_capacity, config.battery_efficiency);
    let mut thermal = config.thermal_demand_series.as_ref().map(|series| {
        (
            StoragePool::new(
                config.thermal_storage_capacity,
                config.thermal_storage_efficiency,
            ),
            series,
        )
    });
    let mut generation_off = false;

    let clock = SimClock::new(config.start, config.step_duration, config.step_count);
    let mut steps = Vec::with_capacity(config.step_count);

    for (t, timestamp) in clock.timestamps().into_iter().enumerate() {
        let gated = config.enable_gating && generation_off;
        let (solar_kw, wind_kw, chp_kw) = if gated {
            (0.0, 0.0, 0.0)
        } else {
            (profiles.solar_kw[t], profiles.wind_kw[t], profiles.chp_kw[t])
        };
        let total_generation_kw = solar_kw + wind_kw + chp_kw;
        let demand_kw = config.demand_series[t];

        // 1. Battery
        let input = DispatchInput {
            net_generation_kw: total_generation_kw,
            demand_kw,
            dt_hours: dt,
        };
        let outcome = dispatcher.dispatch(&input, &mut battery);

        // 2. Generation gate, effective from the next step
        if config.enable_gating {
            let was_off = generation_off;
            if battery.is_full() {
                generation_off = true;
            } else if battery.is_empty() {
                generation_off = false;
            }
            if was_off != generation_off {
                debug!(
                    timestep = t,
                    level_kwh = battery.level_kwh(),
                    generation_off,
                    "generation gate switched"
                );
            }
        }

        // 3. Thermal pool, driven by the ungated CHP profile
        let thermal_record = thermal.as_mut().map(|(pool, demand)| {
            let thermal_demand_kw = demand[t];
            let net_thermal_kwh = (profiles.chp_kw[t] - thermal_demand_kw) * dt;
            let change_kwh = if net_thermal_kwh > 0.0 {
                pool.charge(net_thermal_kwh)
            } else {
                -pool.discharge(-net_thermal_kwh)
            };
            ThermalRecord {
                level_kwh: pool.level_kwh(),
                change_kwh,
                demand_kw: thermal_demand_kw,
            }
        });

        steps.push(StepRecord {
            timestep: t,
            timestamp,
            solar_kw,
            wind_kw,
            chp_kw,
            total_generation_kw,
            demand_kw,
            surplus_kw: total_generation_kw - demand_kw,
            generation_off: gated,
            battery_level_kwh: battery.level_kwh(),
            battery_change_kwh: outcome.change_kwh,
            grid_export_kwh: outcome.grid_export_kwh,
            grid_import_kwh: outcome.grid_import_kwh,
            thermal: thermal_record,
        });
    }

    info!(
        steps = steps.len(),
        final_battery_kwh = battery.level_kwh(),
        "dispatch simulation finished"
    );

    Ok(SimulationResult {
        steps,
        dt_hours: dt,
        battery_capacity_kwh: battery.capacity_kwh,
        thermal_capacity_kwh: thermal.map(|(pool, _)| pool.capacity_kwh),
        peak_threshold_kw,
    })
}
