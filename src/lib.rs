//! Microgrid energy dispatch simulator.
//!
//! Solar, wind, and CHP generation feed an electrical battery under a
//! default or peak-shaving policy, with optional generation gating and an
//! optional thermal storage pool driven by the CHP unit.

/// TOML scenario files and built-in presets.
pub mod config;
/// Demand input providers.
pub mod demand;
pub mod devices;
/// CSV and JSON input/output.
pub mod io;
pub mod logging;
pub mod runner;
/// Simulation engine, dispatch policies, and KPIs.
pub mod sim;
