//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use microgrid_sim::sim::types::{RampTargets, SimulationConfig, StepDuration};

/// Fixed start timestamp (2024-06-01 00:00) so solar hours are reproducible.
pub fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid date")
}

/// Hourly, ungated configuration with zero capacities and unit efficiencies.
pub fn hourly_config(demand: Vec<f32>) -> SimulationConfig {
    SimulationConfig {
        start: start(),
        enable_gating: false,
        ramp: RampTargets::NONE,
        ..SimulationConfig::new(StepDuration::Hourly, demand)
    }
}

/// CHP-only configuration: constant `chp_kw` output into a `battery_kwh` battery.
pub fn chp_only(chp_kw: f32, battery_kwh: f32, demand: Vec<f32>) -> SimulationConfig {
    SimulationConfig {
        chp_capacity: chp_kw,
        battery_capacity: battery_kwh,
        ..hourly_config(demand)
    }
}

/// Full-mix configuration over `days` hourly days with a sinusoidal demand.
pub fn mixed_config(days: usize, seed: u64) -> SimulationConfig {
    let steps = 24 * days;
    let demand = (0..steps)
        .map(|t| 60.0 + 40.0 * ((t as f32) * std::f32::consts::PI / 12.0).sin())
        .collect();
    SimulationConfig {
        solar_capacity: 80.0,
        wind_capacity: 30.0,
        chp_capacity: 20.0,
        battery_capacity: 150.0,
        battery_efficiency: 0.9,
        thermal_storage_capacity: 60.0,
        thermal_storage_efficiency: 0.85,
        thermal_demand_series: Some(vec![15.0; steps]),
        ramp: RampTargets::WIND_ONLY,
        ramp_rate: 5.0,
        seed,
        ..hourly_config(demand)
    }
}
