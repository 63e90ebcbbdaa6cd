/// An energy storage pool that absorbs surplus and covers deficits.
///
/// `StoragePool` models both the electrical battery and the thermal store.
/// It starts empty, applies its efficiency on the charge side only, and keeps
/// its level inside `[0, capacity_kwh]` at every assignment.
///
/// # Examples
///
/// ```
/// use microgrid_sim::devices::StoragePool;
///
/// let mut pool = StoragePool::new(50.0, 0.9);
/// assert_eq!(pool.charge(100.0), 50.0); // limited by headroom
/// assert_eq!(pool.discharge(20.0), 20.0);
/// assert_eq!(pool.level_kwh(), 30.0);
/// ```
#[derive(Debug, Clone)]
pub struct StoragePool {
    /// Maximum stored energy in kilowatt-hours.
    pub capacity_kwh: f32,

    /// Charging efficiency (0.0 to 1.0).
    pub efficiency: f32,

    /// Stored energy in kilowatt-hours.
    level_kwh: f32,
}

impl StoragePool {
    /// Creates an empty pool.
    ///
    /// # Arguments
    ///
    /// * `capacity_kwh` - Maximum stored energy (negative clamps to 0)
    /// * `efficiency` - Charge-side efficiency, clamped into `[0, 1]`
    pub fn new(capacity_kwh: f32, efficiency: f32) -> Self {
        Self {
            capacity_kwh: capacity_kwh.max(0.0),
            efficiency: efficiency.clamp(0.0, 1.0),
            level_kwh: 0.0,
        }
    }

    pub fn level_kwh(&self) -> f32 {
        self.level_kwh
    }

    /// Remaining room before the pool is full (kWh).
    pub fn headroom_kwh(&self) -> f32 {
        (self.capacity_kwh - self.level_kwh).max(0.0)
    }

    pub fn is_full(&self) -> bool {
        self.level_kwh >= self.capacity_kwh
    }

    pub fn is_empty(&self) -> bool {
        self.level_kwh <= 0.0
    }

    /// Offers `surplus_kwh` of energy to the pool.
    ///
    /// Stores `min(surplus * efficiency, headroom)` and returns the energy
    /// actually added to the level. An offer covering the headroom leaves the
    /// level at exactly `capacity_kwh`.
    pub fn charge(&mut self, surplus_kwh: f32) -> f32 {
        let offered = surplus_kwh.max(0.0) * self.efficiency;
        if offered >= self.headroom_kwh() {
            return self.set_level(self.capacity_kwh);
        }
        self.set_level(self.level_kwh + offered)
    }

    /// Requests `deficit_kwh` of energy from the pool.
    ///
    /// Releases `min(deficit, level)` and returns the energy actually removed.
    /// A request covering the level leaves the pool at exactly zero.
    pub fn discharge(&mut self, deficit_kwh: f32) -> f32 {
        let requested = deficit_kwh.max(0.0);
        if requested >= self.level_kwh {
            return -self.set_level(0.0);
        }
        -self.set_level(self.level_kwh - requested)
    }

    /// Assigns a clamped level and returns the signed change.
    fn set_level(&mut self, level_kwh: f32) -> f32 {
        let before = self.level_kwh;
        self.level_kwh = level_kwh.clamp(0.0, self.capacity_kwh);
        self.level_kwh - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pool_is_empty() {
        let pool = StoragePool::new(10.0, 0.95);
        assert_eq!(pool.capacity_kwh, 10.0);
        assert_eq!(pool.efficiency, 0.95);
        assert_eq!(pool.level_kwh(), 0.0);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_efficiency_applied_on_charge() {
        let mut pool = StoragePool::new(10.0, 0.9);
        let stored = pool.charge(5.0);
        assert!((stored - 4.5).abs() < 1e-6);
        assert!((pool.level_kwh() - 4.5).abs() < 1e-6);
    }

    #[test]
    fn test_no_loss_on_discharge() {
        let mut pool = StoragePool::new(10.0, 0.5);
        pool.charge(10.0);
        assert_eq!(pool.discharge(3.0), 3.0);
        assert_eq!(pool.level_kwh(), 2.0);
    }

    #[test]
    fn test_charge_capacity_limit() {
        let mut pool = StoragePool::new(10.0, 1.0);
        pool.charge(8.0);
        assert_eq!(pool.charge(8.0), 2.0);
        assert!(pool.is_full());
        assert_eq!(pool.charge(1.0), 0.0);
    }

    #[test]
    fn test_fill_to_headroom_lands_on_capacity() {
        // 0.208 + (1.85 - 0.208) rounds below 1.85 in f32
        let mut pool = StoragePool::new(1.85, 1.0);
        pool.charge(0.208);
        let stored = pool.charge(100.0);
        assert!(pool.is_full());
        assert_eq!(pool.level_kwh(), 1.85);
        assert_eq!(stored, 1.85 - 0.208);
    }

    #[test]
    fn test_fill_to_headroom_is_full_across_capacities() {
        for cap_steps in 1..400 {
            for level_steps in 1..40 {
                let capacity = cap_steps as f32 * 0.037;
                let mut pool = StoragePool::new(capacity, 0.93);
                pool.charge(level_steps as f32 * 0.013);
                pool.charge(capacity * 2.0);
                assert!(pool.is_full(), "capacity {capacity} level step {level_steps}");
            }
        }
    }

    #[test]
    fn test_discharge_level_limit() {
        let mut pool = StoragePool::new(10.0, 1.0);
        pool.charge(1.0);
        assert_eq!(pool.discharge(5.0), 1.0);
        assert!(pool.is_empty());
        assert_eq!(pool.discharge(5.0), 0.0);
    }

    #[test]
    fn test_negative_requests_are_ignored() {
        let mut pool = StoragePool::new(10.0, 1.0);
        assert_eq!(pool.charge(-3.0), 0.0);
        assert_eq!(pool.discharge(-3.0), 0.0);
        assert_eq!(pool.level_kwh(), 0.0);
    }

    #[test]
    fn test_zero_capacity_never_stores() {
        let mut pool = StoragePool::new(0.0, 1.0);
        assert_eq!(pool.charge(100.0), 0.0);
        assert!(pool.is_full() && pool.is_empty());
    }

    #[test]
    fn test_level_stays_in_bounds_over_cycles() {
        let mut pool = StoragePool::new(7.3, 0.87);
        for i in 0..200 {
            if i % 3 == 0 {
                pool.discharge(2.9);
            } else {
                pool.charge(1.7);
            }
            assert!(pool.level_kwh() >= 0.0 && pool.level_kwh() <= pool.capacity_kwh);
        }
    }
}
