//! Post-hoc KPI computation from simulation results.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use super::types::SimulationResult;

/// Energy balance of one calendar day of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyBalance {
    pub date: NaiveDate,
    /// Total generation used for dispatch (kWh).
    pub generation_kwh: f32,
    /// Total demand (kWh).
    pub demand_kwh: f32,
    /// `min(generation, demand)` over the day (kWh).
    pub directly_consumed_kwh: f32,
    /// Share of demand met by local generation (0.0 to 1.0).
    pub self_sufficiency: f32,
    /// Share of generation consumed locally (0.0 to 1.0).
    pub self_consumption: f32,
}

/// Aggregate key performance indicators derived from a complete simulation run.
///
/// Computed post-hoc from a [`SimulationResult`] so reported metrics always
/// agree with the step data.
#[derive(Debug, Clone, Serialize)]
pub struct KpiReport {
    /// Total generation used for dispatch (kWh).
    pub total_generation_kwh: f32,
    /// Total electrical demand (kWh).
    pub total_demand_kwh: f32,
    /// Energy stored into the battery (kWh).
    pub battery_charged_kwh: f32,
    /// Energy released from the battery (kWh).
    pub battery_discharged_kwh: f32,
    /// Highest battery level reached (kWh).
    pub peak_battery_kwh: f32,
    /// Battery equivalent full cycles (discharged / capacity).
    pub battery_equivalent_full_cycles: f32,
    /// Surplus exported to the grid (kWh).
    pub grid_export_kwh: f32,
    /// Deficit imported from the grid (kWh).
    pub grid_import_kwh: f32,
    /// Number of steps with generation suppressed by the gate.
    pub curtailed_steps: usize,
    /// Final thermal level, when thermal modeling was enabled (kWh).
    pub final_thermal_kwh: Option<f32>,
    /// Per-day self-sufficiency and self-consumption.
    pub daily: Vec<DailyBalance>,
}

impl KpiReport {
    /// Computes all KPIs from a complete run.
    ///
    /// # Arguments
    ///
    /// * `result` - Complete simulation result
    ///
    /// # Returns
    ///
    /// A `KpiReport` with all fields populated; an empty result yields zeros.
    pub fn from_result(result: &SimulationResult) -> Self {
        let dt = result.dt_hours;
        let mut generation = 0.0_f32;
        let mut demand = 0.0_f32;
        let mut charged = 0.0_f32;
        let mut discharged = 0.0_f32;
        let mut peak = 0.0_f32;
        let mut export = 0.0_f32;
        let mut import = 0.0_f32;
        let mut curtailed = 0_usize;
        let mut days: BTreeMap<NaiveDate, (f32, f32)> = BTreeMap::new();

        for s in &result.steps {
            let gen_kwh = s.total_generation_kw * dt;
            let demand_kwh = s.demand_kw * dt;
            generation += gen_kwh;
            demand += demand_kwh;

            if s.battery_change_kwh > 0.0 {
                charged += s.battery_change_kwh;
            } else {
                discharged -= s.battery_change_kwh;
            }
            peak = peak.max(s.battery_level_kwh);
            export += s.grid_export_kwh;
            import += s.grid_import_kwh;
            if s.generation_off {
                curtailed += 1;
            }

            let day = days.entry(s.timestamp.date()).or_default();
            day.0 += gen_kwh;
            day.1 += demand_kwh;
        }

        let cycles = if result.battery_capacity_kwh > 0.0 {
            discharged / result.battery_capacity_kwh
        } else {
            0.0
        };

        Self {
            total_generation_kwh: generation,
            total_demand_kwh: demand,
            battery_charged_kwh: charged,
            battery_discharged_kwh: discharged,
            peak_battery_kwh: peak,
            battery_equivalent_full_cycles: cycles,
            grid_export_kwh: export,
            grid_import_kwh: import,
            curtailed_steps: curtailed,
            final_thermal_kwh: result
                .steps
                .last()
                .and_then(|s| s.thermal.map(|t| t.level_kwh)),
            daily: days
                .into_iter()
                .map(|(date, (gen_kwh, demand_kwh))| daily_balance(date, gen_kwh, demand_kwh))
                .collect(),
        }
    }

    /// Mean self-sufficiency across all days.
    pub fn mean_self_sufficiency(&self) -> f32 {
        mean(self.daily.iter().map(|d| d.self_sufficiency))
    }

    /// Mean self-consumption across all days.
    pub fn mean_self_consumption(&self) -> f32 {
        mean(self.daily.iter().map(|d| d.self_consumption))
    }
}

fn daily_balance(date: NaiveDate, generation_kwh: f32, demand_kwh: f32) -> DailyBalance {
    let consumed = generation_kwh.min(demand_kwh);
    DailyBalance {
        date,
        generation_kwh,
        demand_kwh,
        directly_consumed_kwh: consumed,
        self_sufficiency: ratio(consumed, demand_kwh),
        self_consumption: ratio(consumed, generation_kwh),
    }
}

fn ratio(num: f32, den: f32) -> f32 {
    if den > 0.0 { num / den } else { 0.0 }
}

fn mean(values: impl Iterator<Item = f32>) -> f32 {
    let (sum, n) = values.fold((0.0_f32, 0_usize), |(s, n), v| (s + v, n + 1));
    if n == 0 { 0.0 } else { sum / n as f32 }
}

impl fmt::Display for KpiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- KPI Report ---")?;
        writeln!(f, "Total generation:      {:.2} kWh", self.total_generation_kwh)?;
        writeln!(f, "Total demand:          {:.2} kWh", self.total_demand_kwh)?;
        writeln!(
            f,
            "Battery charged:       {:.2} kWh (discharged {:.2} kWh, {:.2} equiv. cycles)",
            self.battery_charged_kwh,
            self.battery_discharged_kwh,
            self.battery_equivalent_full_cycles
        )?;
        writeln!(f, "Peak battery level:    {:.2} kWh", self.peak_battery_kwh)?;
        writeln!(f, "Grid export:           {:.2} kWh", self.grid_export_kwh)?;
        writeln!(f, "Grid import:           {:.2} kWh", self.grid_import_kwh)?;
        writeln!(f, "Curtailed steps:       {}", self.curtailed_steps)?;
        if let Some(th) = self.final_thermal_kwh {
            writeln!(f, "Final thermal level:   {th:.2} kWh")?;
        }
        writeln!(
            f,
            "Self-sufficiency:      {:.1}%",
            self.mean_self_sufficiency() * 100.0
        )?;
        write!(
            f,
            "Self-consumption:      {:.1}%",
            self.mean_self_consumption() * 100.0
        )?;
        for d in &self.daily {
            write!(
                f,
                "\n  {}  sufficiency={:.1}%  consumption={:.1}%",
                d.date,
                d.self_sufficiency * 100.0,
                d.self_consumption * 100.0
            )?;
        }
        Ok(())
    }
}
