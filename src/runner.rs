//! Scenario execution: resolves a [`ScenarioConfig`] into simulator input and runs it.

use std::path::Path;

use tracing::info;

use crate::config::{BuildingConfig, ScenarioConfig, SeriesSource};
use crate::demand::{NeighborhoodDemand, repeat_to_horizon, uniform_profile};
use crate::io::import::read_series_csv;
use crate::sim::clock::local_midnight;
use crate::sim::kpi::KpiReport;
use crate::sim::types::{RampTargets, SimulationConfig, SimulationResult};
use crate::sim::{SimError, simulate};

/// Seed offset for random electrical demand to avoid correlation with wind.
const DEMAND_SEED_OFFSET: u64 = 101;
/// Seed offset for random thermal demand.
const THERMAL_SEED_OFFSET: u64 = 202;

/// Output of one scenario run.
#[derive(Debug, Clone)]
pub struct ScenarioRun {
    pub config: SimulationConfig,
    pub result: SimulationResult,
    pub kpi: KpiReport,
}

/// Resolves a scenario into a ready-to-run [`SimulationConfig`].
///
/// Loads demand from the configured source (random, inline profile, CSV, or
/// neighborhood of buildings) and the thermal demand when thermal modeling is
/// enabled.
///
/// # Errors
///
/// Returns the first scenario validation error, or a configuration error if
/// a demand source cannot be loaded.
pub fn build_simulation_config(cfg: &ScenarioConfig) -> Result<SimulationConfig, SimError> {
    if let Some(e) = cfg.validate().into_iter().next() {
        return Err(e.into());
    }

    let s = &cfg.simulation;
    let g = &cfg.generation;
    let steps = s.steps;

    let demand_series = if cfg.demand.source == "neighborhood" {
        neighborhood_demand(&cfg.demand.buildings, steps)?
    } else {
        load_series(
            cfg.demand.series(),
            "demand",
            steps,
            s.seed.wrapping_add(DEMAND_SEED_OFFSET),
        )?
    };
    let thermal_demand_series = if cfg.thermal.enabled {
        Some(load_series(
            cfg.thermal.series(),
            "thermal",
            steps,
            s.seed.wrapping_add(THERMAL_SEED_OFFSET),
        )?)
    } else {
        None
    };

    let mut config = SimulationConfig::new(s.step_duration.parse()?, demand_series);
    config.step_count = steps;
    config.start = cfg.start()?.unwrap_or_else(local_midnight);
    config.seed = s.seed;
    config.dispatch_mode = s.dispatch_mode.parse()?;
    config.enable_gating = s.enable_gating;
    config.solar_capacity = g.solar_capacity_kw;
    config.wind_capacity = g.wind_capacity_kw;
    config.chp_capacity = g.chp_capacity_kw;
    config.use_solar = g.use_solar;
    config.use_wind = g.use_wind;
    config.use_chp = g.use_chp;
    config.wind_model = g.wind_model.parse()?;
    config.ramp_rate = g.ramp_rate;
    config.ramp = RampTargets {
        solar: g.ramp_solar,
        wind: g.ramp_wind,
        chp: g.ramp_chp,
    };
    config.battery_capacity = cfg.battery.capacity_kwh;
    config.battery_efficiency = cfg.battery.efficiency;
    config.thermal_storage_capacity = cfg.thermal.capacity_kwh;
    config.thermal_storage_efficiency = cfg.thermal.efficiency;
    config.thermal_demand_series = thermal_demand_series;
    Ok(config)
}

/// Builds, simulates, and summarizes a scenario.
///
/// # Errors
///
/// Returns any error from [`build_simulation_config`] or the simulator.
pub fn run_scenario(cfg: &ScenarioConfig) -> Result<ScenarioRun, SimError> {
    let config = build_simulation_config(cfg)?;
    let result = simulate(&config)?;
    let kpi = KpiReport::from_result(&result);
    Ok(ScenarioRun {
        config,
        result,
        kpi,
    })
}

fn load_series(
    src: SeriesSource<'_>,
    section: &str,
    steps: usize,
    seed: u64,
) -> Result<Vec<f32>, SimError> {
    match src.source {
        "random" => Ok(uniform_profile(steps, src.min_kw, src.max_kw, seed)),
        "profile" => Ok(repeat_to_horizon(src.profile, steps)),
        "csv" => {
            let path = src.csv_path.ok_or_else(|| {
                SimError::configuration(format!("{section}.csv_path"), "is required")
            })?;
            let series = read_csv(path, src.csv_column, &format!("{section}.csv_path"))?;
            info!(section, path, values = series.len(), "loaded series from csv");
            Ok(series)
        }
        other => Err(SimError::configuration(
            format!("{section}.source"),
            format!("unsupported source \"{other}\""),
        )),
    }
}

fn neighborhood_demand(buildings: &[BuildingConfig], steps: usize) -> Result<Vec<f32>, SimError> {
    let mut neighborhood = NeighborhoodDemand::new();
    for (i, b) in buildings.iter().enumerate() {
        let series = match &b.csv_path {
            Some(path) => read_csv(path, &b.csv_column, &format!("demand.buildings[{i}].csv_path"))?,
            None => repeat_to_horizon(&b.profile, steps),
        };
        neighborhood.add_building(b.name.clone(), series);
    }
    info!(buildings = neighborhood.len(), "merged neighborhood demand");
    neighborhood.total()
}

fn read_csv(path: &str, column: &str, field: &str) -> Result<Vec<f32>, SimError> {
    read_series_csv(Path::new(path), column)
        .map_err(|e| SimError::configuration(field, format!("\"{path}\": {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::types::{DispatchMode, StepDuration};

    fn small(steps: usize) -> ScenarioConfig {
        let mut cfg = ScenarioConfig::microgrid();
        cfg.simulation.steps = steps;
        cfg.simulation.start = Some("2024-01-01T00:00:00".to_string());
        cfg
    }

    #[test]
    fn microgrid_maps_to_simulation_config() {
        let config = build_simulation_config(&small(24)).expect("valid scenario");
        assert_eq!(config.step_count, 24);
        assert_eq!(config.step_duration, StepDuration::Hourly);
        assert_eq!(config.demand_series.len(), 24);
        assert!(config.thermal_demand_series.is_none());
        assert!(config.enable_gating);
        assert_eq!(config.ramp, RampTargets::WIND_ONLY);
    }

    #[test]
    fn random_demand_respects_bounds() {
        let mut cfg = small(48);
        cfg.thermal.enabled = true;
        let config = build_simulation_config(&cfg).expect("valid scenario");
        assert!(config.demand_series.iter().all(|v| (3000.0..=10000.0).contains(v)));
        let thermal = config.thermal_demand_series.unwrap_or_default();
        assert_eq!(thermal.len(), 48);
        assert!(thermal.iter().all(|v| (2000.0..=3999.0).contains(v)));
    }

    #[test]
    fn same_seed_same_run() {
        let a = run_scenario(&small(24)).expect("valid scenario");
        let b = run_scenario(&small(24)).expect("valid scenario");
        assert_eq!(a.result.battery_levels(), b.result.battery_levels());
    }

    #[test]
    fn profile_demand_is_tiled() {
        let mut cfg = small(5);
        cfg.demand.source = "profile".to_string();
        cfg.demand.profile = vec![1.0, 2.0];
        cfg.thermal.enabled = false;
        let config = build_simulation_config(&cfg).expect("valid scenario");
        assert_eq!(config.demand_series, vec![1.0, 2.0, 1.0, 2.0, 1.0]);
        assert!(config.thermal_demand_series.is_none());
    }

    #[test]
    fn neighborhood_demand_is_summed() {
        let mut cfg = small(3);
        cfg.demand.source = "neighborhood".to_string();
        cfg.demand.buildings = vec![
            BuildingConfig {
                name: "a".to_string(),
                profile: vec![1.0],
                ..BuildingConfig::default()
            },
            BuildingConfig {
                name: "b".to_string(),
                profile: vec![2.0, 3.0, 4.0],
                ..BuildingConfig::default()
            },
        ];
        let config = build_simulation_config(&cfg).expect("valid scenario");
        assert_eq!(config.demand_series, vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn missing_csv_is_configuration_error() {
        let mut cfg = small(3);
        cfg.demand.source = "csv".to_string();
        cfg.demand.csv_path = Some("/nonexistent/demand.csv".to_string());
        let err = build_simulation_config(&cfg).err();
        assert!(matches!(
            err,
            Some(SimError::Configuration { ref field, .. }) if field == "demand.csv_path"
        ));
    }

    #[test]
    fn scenario_errors_surface_as_sim_errors() {
        let mut cfg = small(3);
        cfg.simulation.dispatch_mode = "bogus".to_string();
        let err = build_simulation_config(&cfg).err();
        assert_eq!(err.as_ref().map(SimError::field), Some("simulation.dispatch_mode"));
    }

    #[test]
    fn distribution_uses_peak_shaving() {
        let mut cfg = ScenarioConfig::distribution();
        cfg.simulation.steps = 48;
        let run = run_scenario(&cfg).expect("valid scenario");
        assert_eq!(run.config.dispatch_mode, DispatchMode::PeakShaving);
        assert!(run.result.peak_threshold_kw.is_some());
        assert_eq!(run.kpi.daily.len(), 2);
        assert!(run.result.steps.iter().all(|s| !s.generation_off));
    }
}
