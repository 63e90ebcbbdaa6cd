//! Battery dispatch policies.

use crate::devices::StoragePool;

use super::types::DispatchMode;

/// Per-step signals fed to a dispatch policy.
#[derive(Debug, Clone, Copy)]
pub struct DispatchInput {
    /// Generation available for dispatch this step (kW).
    pub net_generation_kw: f32,
    /// Electrical demand this step (kW).
    pub demand_kw: f32,
    /// Step length in hours.
    pub dt_hours: f32,
}

impl DispatchInput {
    /// Surplus energy this step (kWh), zero when generation does not exceed demand.
    pub fn surplus_kwh(&self) -> f32 {
        (self.net_generation_kw - self.demand_kw).max(0.0) * self.dt_hours
    }

    /// Deficit energy this step (kWh), zero when generation covers demand.
    pub fn deficit_kwh(&self) -> f32 {
        (self.demand_kw - self.net_generation_kw).max(0.0) * self.dt_hours
    }

    fn has_surplus(&self) -> bool {
        self.net_generation_kw > self.demand_kw
    }
}

/// Effect of one dispatch decision.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatteryOutcome {
    /// Signed battery change (kWh; positive=charge, negative=discharge).
    pub change_kwh: f32,
    /// Surplus energy not drawn into the battery (kWh, >= 0).
    pub grid_export_kwh: f32,
    /// Deficit energy not covered by the battery (kWh, >= 0).
    pub grid_import_kwh: f32,
}

/// A battery control policy applied once per step.
pub trait DispatchPolicy {
    /// Updates `battery` for this step and reports what happened.
    fn dispatch(&self, input: &DispatchInput, battery: &mut StoragePool) -> BatteryOutcome;
}

/// Charges on any surplus and discharges on any deficit.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultPolicy;

impl DispatchPolicy for DefaultPolicy {
    fn dispatch(&self, input: &DispatchInput, battery: &mut StoragePool) -> BatteryOutcome {
        if input.has_surplus() {
            charge(input, battery)
        } else {
            discharge(input, battery)
        }
    }
}

/// Charges on any surplus; discharges only while demand exceeds `threshold_kw`.
#[derive(Debug, Clone, Copy)]
pub struct PeakShavingPolicy {
    /// Demand level above which the battery may discharge (kW).
    pub threshold_kw: f32,
}

impl DispatchPolicy for PeakShavingPolicy {
    fn dispatch(&self, input: &DispatchInput, battery: &mut StoragePool) -> BatteryOutcome {
        if input.has_surplus() {
            charge(input, battery)
        } else if input.demand_kw > self.threshold_kw && !battery.is_empty() {
            discharge(input, battery)
        } else {
            BatteryOutcome {
                change_kwh: 0.0,
                grid_export_kwh: 0.0,
                grid_import_kwh: input.deficit_kwh(),
            }
        }
    }
}

/// Policy selected from a [`DispatchMode`].
#[derive(Debug, Clone, Copy)]
pub enum Dispatcher {
    Default(DefaultPolicy),
    PeakShaving(PeakShavingPolicy),
}

impl Dispatcher {
    /// Builds the policy for `mode`; `threshold_kw` is only read for peak shaving.
    pub fn for_mode(mode: DispatchMode, threshold_kw: f32) -> Self {
        match mode {
            DispatchMode::Default => Self::Default(DefaultPolicy),
            DispatchMode::PeakShaving => Self::PeakShaving(PeakShavingPolicy { threshold_kw }),
        }
    }
}

impl DispatchPolicy for Dispatcher {
    fn dispatch(&self, input: &DispatchInput, battery: &mut StoragePool) -> BatteryOutcome {
        match self {
            Self::Default(p) => p.dispatch(input, battery),
            Self::PeakShaving(p) => p.dispatch(input, battery),
        }
    }
}

fn charge(input: &DispatchInput, battery: &mut StoragePool) -> BatteryOutcome {
    let surplus = input.surplus_kwh();
    let stored = battery.charge(surplus);
    // energy drawn from the surplus before charge-side losses
    let drawn = if battery.efficiency > 0.0 {
        (stored / battery.efficiency).min(surplus)
    } else {
        0.0
    };
    BatteryOutcome {
        change_kwh: stored,
        grid_export_kwh: (surplus - drawn).max(0.0),
        grid_import_kwh: 0.0,
    }
}

fn discharge(input: &DispatchInput, battery: &mut StoragePool) -> BatteryOutcome {
    let deficit = input.deficit_kwh();
    let released = battery.discharge(deficit);
    BatteryOutcome {
        change_kwh: -released,
        grid_export_kwh: 0.0,
        grid_import_kwh: (deficit - released).max(0.0),
    }
}
