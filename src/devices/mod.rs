//! Generation and storage components of the microgrid.

/// Constant-output combined heat and power unit.
pub mod chp;
/// Diurnal solar generation model.
pub mod solar;
/// Battery and thermal storage pool.
pub mod storage;
pub mod types;
/// Wind generation and its pluggable random draw.
pub mod wind;

// Re-export the main types for convenience
pub use chp::ChpUnit;
pub use solar::SolarArray;
pub use storage::StoragePool;
pub use types::DeviceContext;
pub use types::Generator;
pub use wind::{NormalSampler, SequenceSampler, UniformSampler, WindSampler, WindTurbine, sampler_for};
