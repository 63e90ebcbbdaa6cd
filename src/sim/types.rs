//! Core simulation types: configuration, per-step records, and the run result.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::Serialize;

use super::clock::local_midnight;
use super::error::SimError;

/// Time base of one simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepDuration {
    Hourly,
    QuarterHourly,
}

impl StepDuration {
    /// Step length in hours; power × hours gives energy per step.
    pub fn hours(self) -> f32 {
        match self {
            Self::Hourly => 1.0,
            Self::QuarterHourly => 0.25,
        }
    }

    /// Step length in minutes.
    pub fn minutes(self) -> i64 {
        match self {
            Self::Hourly => 60,
            Self::QuarterHourly => 15,
        }
    }
}

impl FromStr for StepDuration {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hourly" => Ok(Self::Hourly),
            "15-min" | "15min" => Ok(Self::QuarterHourly),
            other => Err(SimError::configuration(
                "step_duration",
                format!("must be \"hourly\" or \"15-min\", got \"{other}\""),
            )),
        }
    }
}

impl fmt::Display for StepDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hourly => write!(f, "hourly"),
            Self::QuarterHourly => write!(f, "15-min"),
        }
    }
}

/// Battery control policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Charge on surplus, discharge on any deficit.
    #[default]
    Default,
    /// Charge on surplus, discharge only while demand is above the
    /// 80th percentile of the whole demand series.
    PeakShaving,
}

impl FromStr for DispatchMode {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "peak_shaving" => Ok(Self::PeakShaving),
            other => Err(SimError::configuration(
                "dispatch_mode",
                format!("must be \"default\" or \"peak_shaving\", got \"{other}\""),
            )),
        }
    }
}

/// Distribution of the pseudo-random wind draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindModel {
    /// Absolute value of a standard-normal sample.
    #[default]
    Normal,
    /// Uniform sample in `[0, 1)`.
    Uniform,
}

impl FromStr for WindModel {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Self::Normal),
            "uniform" => Ok(Self::Uniform),
            other => Err(SimError::configuration(
                "wind_model",
                format!("must be \"normal\" or \"uniform\", got \"{other}\""),
            )),
        }
    }
}

/// Which generation profiles pass through the ramp filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RampTargets {
    pub solar: bool,
    pub wind: bool,
    pub chp: bool,
}

impl RampTargets {
    /// Wind only; the behavior of the gated microgrid pipeline.
    pub const WIND_ONLY: Self = Self {
        solar: false,
        wind: true,
        chp: false,
    };

    /// Wind and CHP; the behavior of the ungated distribution scripts.
    pub const WIND_AND_CHP: Self = Self {
        solar: false,
        wind: true,
        chp: true,
    };

    /// No profile is ramp-limited.
    pub const NONE: Self = Self {
        solar: false,
        wind: false,
        chp: false,
    };
}

impl Default for RampTargets {
    fn default() -> Self {
        Self::WIND_ONLY
    }
}

/// Immutable input of one dispatch run.
///
/// Power magnitudes are in kW, energy magnitudes in kWh. Build one with
/// [`SimulationConfig::new`] and override fields with struct-update syntax.
///
/// # Examples
///
/// ```
/// use microgrid_sim::sim::types::{SimulationConfig, StepDuration};
///
/// let cfg = SimulationConfig {
///     chp_capacity: 100.0,
///     battery_capacity: 50.0,
///     ..SimulationConfig::new(StepDuration::Hourly, vec![50.0; 24])
/// };
/// assert_eq!(cfg.step_count, 24);
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Number of time steps.
    pub step_count: usize,
    /// Time base for energy and ramp interpretation.
    pub step_duration: StepDuration,
    /// Timestamp of step 0.
    pub start: NaiveDateTime,
    /// Peak solar output (kW).
    pub solar_capacity: f32,
    /// Wind output scale (kW).
    pub wind_capacity: f32,
    /// Constant CHP electrical output (kW).
    pub chp_capacity: f32,
    /// Maximum stored battery energy (kWh).
    pub battery_capacity: f32,
    /// Charge-side efficiency (0.0 to 1.0).
    pub battery_efficiency: f32,
    /// Maximum stored thermal energy (kWh).
    pub thermal_storage_capacity: f32,
    /// Thermal charge-side efficiency (0.0 to 1.0).
    pub thermal_storage_efficiency: f32,
    pub use_solar: bool,
    pub use_wind: bool,
    pub use_chp: bool,
    /// Maximum change of a ramped profile between consecutive steps (kW).
    pub ramp_rate: f32,
    /// Profiles subject to `ramp_rate`.
    pub ramp: RampTargets,
    pub dispatch_mode: DispatchMode,
    /// Suppress generation while the battery is full until it is empty again.
    pub enable_gating: bool,
    pub wind_model: WindModel,
    /// Seed for the wind sampler built by [`crate::sim::engine::simulate`].
    pub seed: u64,
    /// Electrical demand per step (kW), length `step_count`.
    pub demand_series: Vec<f32>,
    /// Thermal demand per step (kW); `None` disables thermal modeling.
    pub thermal_demand_series: Option<Vec<f32>>,
}

impl SimulationConfig {
    /// Default ramp rate per step (kW).
    pub const DEFAULT_RAMP_RATE: f32 = 0.5;

    /// Creates the gated, wind-only-ramped configuration with all generators
    /// enabled, zero capacities, and `step_count == demand_series.len()`.
    ///
    /// Step 0 starts at today's local midnight.
    pub fn new(step_duration: StepDuration, demand_series: Vec<f32>) -> Self {
        Self {
            step_count: demand_series.len(),
            step_duration,
            start: local_midnight(),
            solar_capacity: 0.0,
            wind_capacity: 0.0,
            chp_capacity: 0.0,
            battery_capacity: 0.0,
            battery_efficiency: 1.0,
            thermal_storage_capacity: 0.0,
            thermal_storage_efficiency: 1.0,
            use_solar: true,
            use_wind: true,
            use_chp: true,
            ramp_rate: Self::DEFAULT_RAMP_RATE,
            ramp: RampTargets::WIND_ONLY,
            dispatch_mode: DispatchMode::Default,
            enable_gating: true,
            wind_model: WindModel::Normal,
            seed: 0,
            demand_series,
            thermal_demand_series: None,
        }
    }

    /// Step length in hours.
    pub fn dt_hours(&self) -> f32 {
        self.step_duration.hours()
    }

    /// Whether the independent thermal pool is simulated.
    pub fn thermal_enabled(&self) -> bool {
        self.thermal_demand_series.is_some()
    }

    /// Checks every input constraint, returning the first violation.
    ///
    /// # Errors
    ///
    /// [`SimError::Configuration`] for a zero step count or mismatched series
    /// lengths; [`SimError::NumericDomain`] for out-of-range magnitudes.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.step_count == 0 {
            return Err(SimError::configuration("step_count", "must be > 0"));
        }
        if self.demand_series.len() != self.step_count {
            return Err(SimError::configuration(
                "demand_series",
                format!(
                    "length {} does not match step_count {}",
                    self.demand_series.len(),
                    self.step_count
                ),
            ));
        }
        if let Some(thermal) = &self.thermal_demand_series {
            if thermal.len() != self.step_count {
                return Err(SimError::configuration(
                    "thermal_demand_series",
                    format!(
                        "length {} does not match step_count {}",
                        thermal.len(),
                        self.step_count
                    ),
                ));
            }
        }

        // ramp_rate may be infinite (no ramp limit); capacities may not
        let magnitudes = [
            ("solar_capacity", self.solar_capacity, false),
            ("wind_capacity", self.wind_capacity, false),
            ("chp_capacity", self.chp_capacity, false),
            ("battery_capacity", self.battery_capacity, false),
            ("thermal_storage_capacity", self.thermal_storage_capacity, false),
            ("ramp_rate", self.ramp_rate, true),
        ];
        for (field, value, allow_infinite) in magnitudes {
            if value.is_nan() || value < 0.0 {
                return Err(SimError::numeric(field, format!("must be >= 0, got {value}")));
            }
            if !allow_infinite && value.is_infinite() {
                return Err(SimError::numeric(field, "must be finite"));
            }
        }

        for (field, value) in [
            ("battery_efficiency", self.battery_efficiency),
            ("thermal_storage_efficiency", self.thermal_storage_efficiency),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimError::numeric(
                    field,
                    format!("must be in [0.0, 1.0], got {value}"),
                ));
            }
        }

        if self.enable_gating && self.battery_capacity <= 0.0 {
            return Err(SimError::numeric(
                "battery_capacity",
                "must be > 0 when generation gating is enabled",
            ));
        }

        check_series("demand_series", &self.demand_series)?;
        if let Some(thermal) = &self.thermal_demand_series {
            check_series("thermal_demand_series", thermal)?;
        }

        Ok(())
    }
}

fn check_series(field: &str, series: &[f32]) -> Result<(), SimError> {
    match series
        .iter()
        .position(|v| !v.is_finite() || *v < 0.0)
    {
        Some(i) => Err(SimError::numeric(
            format!("{field}[{i}]"),
            format!("must be finite and >= 0, got {}", series[i]),
        )),
        None => Ok(()),
    }
}

/// Thermal pool state after one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThermalRecord {
    /// Stored thermal energy after this step (kWh).
    pub level_kwh: f32,
    /// Signed change this step (kWh; positive=charge, negative=discharge).
    pub change_kwh: f32,
    /// Thermal demand this step (kW).
    pub demand_kw: f32,
}

/// Complete record of one simulation step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRecord {
    /// Step index.
    pub timestep: usize,
    /// Simulated wall-clock time of this step.
    pub timestamp: NaiveDateTime,
    /// Solar output used for dispatch (kW).
    pub solar_kw: f32,
    /// Wind output used for dispatch (kW).
    pub wind_kw: f32,
    /// CHP output used for dispatch (kW).
    pub chp_kw: f32,
    /// Sum of the three generator outputs (kW).
    pub total_generation_kw: f32,
    /// Electrical demand (kW).
    pub demand_kw: f32,
    /// `total_generation_kw - demand_kw`.
    pub surplus_kw: f32,
    /// Whether generation was suppressed by the gate on this step.
    pub generation_off: bool,
    /// Stored battery energy after this step (kWh).
    pub battery_level_kwh: f32,
    /// Signed battery change (kWh; positive=charge, negative=discharge).
    pub battery_change_kwh: f32,
    /// Surplus energy not absorbed by the battery (kWh, >= 0).
    pub grid_export_kwh: f32,
    /// Deficit energy not covered by the battery (kWh, >= 0).
    pub grid_import_kwh: f32,
    /// Thermal pool state, when thermal modeling is enabled.
    pub thermal: Option<ThermalRecord>,
}

impl fmt::Display for StepRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>4} {} | gen={:>9.2} kW (solar={:.2} wind={:.2} chp={:.2}){} \
             demand={:>9.2} kW | bat={:>9.2} kWh ({:+.2}) | export={:.2} import={:.2}",
            self.timestep,
            self.timestamp.format("%Y-%m-%d %H:%M"),
            self.total_generation_kw,
            self.solar_kw,
            self.wind_kw,
            self.chp_kw,
            if self.generation_off { " OFF" } else { "" },
            self.demand_kw,
            self.battery_level_kwh,
            self.battery_change_kwh,
            self.grid_export_kwh,
            self.grid_import_kwh,
        )?;
        if let Some(th) = &self.thermal {
            write!(
                f,
                " | thermal={:.2} kWh ({:+.2}) demand={:.2} kW",
                th.level_kwh, th.change_kwh, th.demand_kw
            )?;
        }
        Ok(())
    }
}

/// Output of one dispatch run; built step by step, immutable once returned.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResult {
    /// One record per step, in order.
    pub steps: Vec<StepRecord>,
    /// Step length in hours.
    pub dt_hours: f32,
    /// Battery capacity used for the run (kWh).
    pub battery_capacity_kwh: f32,
    /// Thermal pool capacity, when thermal modeling was enabled (kWh).
    pub thermal_capacity_kwh: Option<f32>,
    /// Demand above which peak shaving discharges (kW).
    pub peak_threshold_kw: Option<f32>,
}

impl SimulationResult {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn battery_levels(&self) -> Vec<f32> {
        self.steps.iter().map(|s| s.battery_level_kwh).collect()
    }

    pub fn battery_changes(&self) -> Vec<f32> {
        self.steps.iter().map(|s| s.battery_change_kwh).collect()
    }

    pub fn total_generation(&self) -> Vec<f32> {
        self.steps.iter().map(|s| s.total_generation_kw).collect()
    }

    /// Thermal levels, or `None` when thermal modeling was disabled.
    pub fn thermal_levels(&self) -> Option<Vec<f32>> {
        self.steps
            .iter()
            .map(|s| s.thermal.map(|t| t.level_kwh))
            .collect()
    }
}
