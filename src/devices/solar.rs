use crate::devices::types::{DeviceContext, Generator};

/// First hour of the daylight window (inclusive).
pub const SUNRISE_HOUR: u32 = 6;
/// Last hour of the daylight window (inclusive).
pub const SUNSET_HOUR: u32 = 18;

/// A solar array with a deterministic diurnal generation shape.
///
/// Output follows a half-sine between `SUNRISE_HOUR` and `SUNSET_HOUR`
/// and is zero at night:
///
/// ```text
/// p(hour) = capacity * sin((hour - 6) * pi / 12)
/// ```
#[derive(Debug, Clone)]
pub struct SolarArray {
    /// Peak power output in kilowatts (reached at noon).
    pub capacity_kw: f32,
}

impl SolarArray {
    /// Creates a new solar array; negative capacities are clamped to zero.
    pub fn new(capacity_kw: f32) -> Self {
        Self {
            capacity_kw: capacity_kw.max(0.0),
        }
    }

    /// Fraction of peak output at a given hour of day.
    pub fn daylight_frac(hour: u32) -> f32 {
        if !(SUNRISE_HOUR..=SUNSET_HOUR).contains(&hour) {
            return 0.0;
        }
        let angle = (hour - SUNRISE_HOUR) as f32 * std::f32::consts::PI / 12.0;
        angle.sin().max(0.0)
    }
}

impl Generator for SolarArray {
    fn power_kw(&mut self, context: &DeviceContext) -> f32 {
        self.capacity_kw * Self::daylight_frac(context.hour)
    }

    fn device_type(&self) -> &'static str {
        "Solar"
    }
}
