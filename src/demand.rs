//! Demand input providers for the simulator.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

use crate::sim::SimError;

/// Seeded random demand with integer values drawn uniformly from `[low, high]`.
///
/// # Arguments
///
/// * `steps` - Number of values to draw
/// * `low` - Inclusive lower bound (kW)
/// * `high` - Inclusive upper bound (kW); swapped with `low` if smaller
/// * `seed` - Random seed for reproducibility
pub fn uniform_profile(steps: usize, low: u32, high: u32, seed: u64) -> Vec<f32> {
    let (low, high) = if low <= high { (low, high) } else { (high, low) };
    let mut rng = StdRng::seed_from_u64(seed);
    (0..steps)
        .map(|_| rng.random_range(low..=high) as f32)
        .collect()
}

/// Tiles `baseline` until it covers `horizon` steps.
///
/// A longer baseline is truncated; an empty baseline yields zeros.
pub fn repeat_to_horizon(baseline: &[f32], horizon: usize) -> Vec<f32> {
    if baseline.is_empty() {
        return vec![0.0; horizon];
    }
    baseline.iter().copied().cycle().take(horizon).collect()
}

/// Per-building demand series summed into one neighborhood profile.
#[derive(Debug, Clone, Default)]
pub struct NeighborhoodDemand {
    buildings: BTreeMap<String, Vec<f32>>,
}

impl NeighborhoodDemand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the demand series of one building.
    ///
    /// A later series for the same building replaces the earlier one.
    pub fn add_building(&mut self, name: impl Into<String>, demand_kw: Vec<f32>) {
        let name = name.into();
        if self.buildings.contains_key(&name) {
            warn!(building = %name, "duplicate building demand, keeping the latest series");
        }
        self.buildings.insert(name, demand_kw);
    }

    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }

    /// Sums all building series step by step.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no building is registered or the
    /// series lengths differ.
    pub fn total(&self) -> Result<Vec<f32>, SimError> {
        let mut iter = self.buildings.iter();
        let Some((_, first)) = iter.next() else {
            return Err(SimError::configuration(
                "demand.buildings",
                "no building demand registered",
            ));
        };
        let mut total = first.clone();
        for (name, series) in iter {
            if series.len() != total.len() {
                return Err(SimError::configuration(
                    format!("demand.buildings.{name}"),
                    format!("has {} values, expected {}", series.len(), total.len()),
                ));
            }
            for (acc, v) in total.iter_mut().zip(series) {
                *acc += v;
            }
        }
        Ok(total)
    }
}
