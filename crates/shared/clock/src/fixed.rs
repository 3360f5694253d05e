use chainwalk_core::{Date, Timestamp};
use chainwalk_ports::Clock;
use chrono::{Duration, NaiveTime};
use parking_lot::RwLock;
use std::sync::Arc;

/// Clock pinned to an explicit instant
///
/// Only advances when explicitly moved, which makes horizon checks in
/// backfills and tests deterministic. Cloning shares the underlying time.
#[derive(Clone)]
pub struct FixedClock {
    current_time: Arc<RwLock<Timestamp>>,
}

impl FixedClock {
    /// Create a clock fixed at `time`
    pub fn new(time: Timestamp) -> Self {
        Self {
            current_time: Arc::new(RwLock::new(time)),
        }
    }

    /// Create a clock fixed at midnight UTC of `date`
    pub fn at_date(date: Date) -> Self {
        Self::new(date.and_time(NaiveTime::MIN).and_utc())
    }

    /// Advance the pinned time by a duration
    pub fn advance(&self, duration: Duration) {
        let mut current = self.current_time.write();
        *current += duration;
    }

    /// Advance the pinned time by whole days
    pub fn advance_days(&self, days: i64) {
        self.advance(Duration::days(days));
    }

    /// Explicitly set the pinned time
    pub fn set_time(&self, time: Timestamp) {
        *self.current_time.write() = time;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        *self.current_time.read()
    }

    fn name(&self) -> &str {
        "FixedClock"
    }
}
