/// Simulation clock for timestep management.
pub mod clock;
/// Battery dispatch policies.
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod kpi;
/// Ramp-rate limiting of generation profiles.
pub mod ramp;
pub mod stats;
pub mod types;

pub use engine::{simulate, simulate_with_sampler};
pub use error::SimError;
