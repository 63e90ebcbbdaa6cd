//! Common types and traits for generation devices.

use rand::{Rng, rngs::StdRng};

/// Contextual information passed to generators for one step.
/// # Fields
/// * `hour` - Hour of day (0..24) of the step's simulated timestamp
pub struct DeviceContext {
    pub hour: u32,
}

impl DeviceContext {
    /// Creates a new DeviceContext for the given hour of day.
    pub fn new(hour: u32) -> Self {
        Self { hour }
    }
}

/// Trait defining a device that produces electricity.
///
/// Generators are sampled once per step, in step order, to build the
/// generation profile before dispatch starts.
pub trait Generator {
    /// Returns the power output at the specified step.
    ///
    /// # Arguments
    ///
    /// * `context` - Hour of day of the step
    ///
    /// # Returns
    ///
    /// Non-negative power in kilowatts (kW)
    fn power_kw(&mut self, context: &DeviceContext) -> f32;

    /// Returns a human-readable type name for the device, used in logs.
    fn device_type(&self) -> &'static str;
}

/// Utility function to generate Gaussian noise using Box-Muller transform.
///
/// # Arguments
///
/// * `rng` - Random number generator
/// * `std_dev` - Standard deviation of the noise
///
/// # Returns
///
/// Random value from a Gaussian distribution with mean 0 and specified standard deviation
pub fn gaussian_noise(rng: &mut StdRng, std_dev: f32) -> f32 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f32 = rng.random::<f32>().clamp(1e-6, 1.0);
    let u2: f32 = rng.random::<f32>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos();
    z0 * std_dev
}
