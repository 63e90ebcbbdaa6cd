use chrono::{Duration, Local, NaiveDateTime, Timelike};

use super::types::StepDuration;

/// Returns today's local day boundary (midnight).
pub fn local_midnight() -> NaiveDateTime {
    Local::now().date_naive().and_time(chrono::NaiveTime::MIN)
}

/// A simulation clock mapping step indices to simulated timestamps.
///
/// Step `i` is stamped `start + i * step_duration`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use microgrid_sim::sim::clock::SimClock;
/// use microgrid_sim::sim::types::StepDuration;
///
/// let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let mut clock = SimClock::new(start, StepDuration::QuarterHourly, 3);
/// let mut hours = Vec::new();
///
/// clock.run(|_, _, hour| hours.push(hour));
/// assert_eq!(hours, vec![0, 0, 0]);
/// ```
pub struct SimClock {
    /// Timestamp of step 0
    start: NaiveDateTime,
    /// Spacing between steps in minutes
    step_minutes: i64,
    /// Current step of the simulation
    current: usize,
    /// Total steps to run in the simulation
    total: usize,
}

impl SimClock {
    /// Creates a clock that yields `total` steps from `start`.
    pub fn new(start: NaiveDateTime, step_duration: StepDuration, total: usize) -> Self {
        Self {
            start,
            step_minutes: step_duration.minutes(),
            current: 0,
            total,
        }
    }

    /// Timestamp of step `i`.
    pub fn timestamp(&self, i: usize) -> NaiveDateTime {
        self.start + Duration::minutes(self.step_minutes * i as i64)
    }

    /// Advances the clock by one step.
    ///
    /// # Returns
    ///
    /// * `Some((step, timestamp))` - The step index and its timestamp before advancing
    /// * `None` - If the clock has reached its total steps
    pub fn tick(&mut self) -> Option<(usize, NaiveDateTime)> {
        if self.current < self.total {
            let step = self.current;
            self.current += 1;
            Some((step, self.timestamp(step)))
        } else {
            None
        }
    }

    /// Runs `f(step, timestamp, hour_of_day)` for each remaining step.
    pub fn run(&mut self, mut f: impl FnMut(usize, NaiveDateTime, u32)) {
        while let Some((step, ts)) = self.tick() {
            f(step, ts, ts.hour());
        }
    }

    /// All remaining timestamps, consuming the clock.
    pub fn timestamps(mut self) -> Vec<NaiveDateTime> {
        let mut out = Vec::with_capacity(self.total - self.current);
        while let Some((_, ts)) = self.tick() {
            out.push(ts);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid date")
    }

    #[test]
    fn test_tick() {
        let mut clock = SimClock::new(start(), StepDuration::Hourly, 2);
        assert_eq!(clock.tick().map(|(i, _)| i), Some(0));
        assert_eq!(clock.tick().map(|(i, ts)| (i, ts.hour())), Some((1, 1)));
        assert_eq!(clock.tick(), None);
    }

    #[test]
    fn test_hourly_wraps_day() {
        let clock = SimClock::new(start(), StepDuration::Hourly, 26);
        let ts = clock.timestamps();
        assert_eq!(ts[23].hour(), 23);
        assert_eq!(ts[24].hour(), 0);
        assert_eq!(ts[25].date(), NaiveDate::from_ymd_opt(2024, 1, 2).expect("valid date"));
    }

    #[test]
    fn test_quarter_hourly_spacing() {
        let clock = SimClock::new(start(), StepDuration::QuarterHourly, 8);
        let ts = clock.timestamps();
        assert_eq!(ts[3].minute(), 45);
        assert_eq!(ts[4].hour(), 1);
        assert_eq!(ts[4].minute(), 0);
    }

    #[test]
    fn test_far_index_keeps_full_offset() {
        // one leap year of quarter-hour steps plus one day
        let clock = SimClock::new(start(), StepDuration::QuarterHourly, 0);
        let ts = clock.timestamp(96 * 367);
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2025, 1, 2).expect("valid date"));

        // past u32::MAX steps the offset must not wrap back to day one
        let far = (1_usize << 32) + 96;
        assert_ne!(clock.timestamp(far), clock.timestamp(96));
        assert!(clock.timestamp(far).year() > 100_000);
    }

    #[test]
    fn test_empty_clock() {
        let mut clock = SimClock::new(start(), StepDuration::Hourly, 0);
        assert_eq!(clock.tick(), None);

        let mut was_called = false;
        clock.run(|_, _, _| was_called = true);
        assert!(!was_called);
    }

    #[test]
    fn local_midnight_is_day_boundary() {
        let m = local_midnight();
        assert_eq!((m.hour(), m.minute(), m.second()), (0, 0, 0));
    }
}
