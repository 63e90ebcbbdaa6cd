use crate::devices::types::{DeviceContext, Generator};

/// Combined heat and power unit running at constant electrical output.
///
/// The same output drives the thermal pool (see the thermal update in
/// [`crate::sim::engine`]).
#[derive(Debug, Clone)]
pub struct ChpUnit {
    /// Electrical output in kilowatts.
    pub capacity_kw: f32,
}

impl ChpUnit {
    pub fn new(capacity_kw: f32) -> Self {
        Self {
            capacity_kw: capacity_kw.max(0.0),
        }
    }
}

impl Generator for ChpUnit {
    fn power_kw(&mut self, _context: &DeviceContext) -> f32 {
        self.capacity_kw
    }

    fn device_type(&self) -> &'static str {
        "CHP"
    }
}
