//! Integration tests for the generation gate.

mod common;

use microgrid_sim::devices::SequenceSampler;
use microgrid_sim::sim::kpi::KpiReport;
use microgrid_sim::sim::types::SimulationConfig;
use microgrid_sim::sim::{SimError, simulate, simulate_with_sampler};

fn gated_scenario() -> SimulationConfig {
    SimulationConfig {
        enable_gating: true,
        ..common::chp_only(100.0, 50.0, vec![0.0, 0.0, 40.0, 40.0, 40.0, 0.0])
    }
}

#[test]
fn gate_latches_until_battery_empties() {
    let result = simulate(&gated_scenario()).expect("valid config");
    assert_eq!(
        result.total_generation(),
        vec![100.0, 0.0, 0.0, 0.0, 100.0, 0.0]
    );
    assert_eq!(
        result.battery_levels(),
        vec![50.0, 50.0, 10.0, 0.0, 50.0, 50.0]
    );
    let flags: Vec<bool> = result.steps.iter().map(|s| s.generation_off).collect();
    assert_eq!(flags, vec![false, true, true, true, false, true]);
}

#[test]
fn gate_trips_when_fill_leaves_rounding_gap() {
    // 0.208 + (1.85 - 0.208) is one ulp short of 1.85 in f32
    let cfg = SimulationConfig {
        wind_capacity: 1.0,
        battery_capacity: 1.85,
        battery_efficiency: 1.0,
        enable_gating: true,
        ..common::hourly_config(vec![0.0; 4])
    };
    let mut sampler = SequenceSampler::new(vec![0.208, 100.0, 100.0, 100.0]);
    let result = simulate_with_sampler(&cfg, &mut sampler).expect("valid config");

    assert_eq!(result.steps[1].battery_level_kwh, 1.85);
    assert!(!result.steps[1].generation_off);
    assert!(result.steps[2].generation_off);
    assert_eq!(result.steps[2].total_generation_kw, 0.0);
    assert_eq!(result.steps[2].battery_change_kwh, 0.0);
}

#[test]
fn gated_deficit_is_imported() {
    let result = simulate(&gated_scenario()).expect("valid config");
    assert_eq!(result.steps[3].grid_import_kwh, 30.0);
    assert_eq!(result.steps[0].grid_export_kwh, 50.0);
}

#[test]
fn thermal_pool_ignores_gate() {
    let cfg = SimulationConfig {
        thermal_storage_capacity: 1000.0,
        thermal_storage_efficiency: 1.0,
        thermal_demand_series: Some(vec![20.0; 6]),
        ..gated_scenario()
    };
    let result = simulate(&cfg).expect("valid config");
    let levels = result.thermal_levels().expect("thermal enabled");
    assert_eq!(levels, vec![80.0, 160.0, 240.0, 320.0, 400.0, 480.0]);
}

#[test]
fn kpi_counts_curtailed_steps() {
    let result = simulate(&gated_scenario()).expect("valid config");
    let kpi = KpiReport::from_result(&result);
    assert_eq!(kpi.curtailed_steps, 4);
    assert_eq!(kpi.total_generation_kwh, 200.0);
}

#[test]
fn gating_requires_battery() {
    let cfg = SimulationConfig {
        battery_capacity: 0.0,
        ..gated_scenario()
    };
    let err = simulate(&cfg).err();
    assert!(matches!(err, Some(SimError::NumericDomain { .. })));
}
