use chainwalk_core::{Date, Timestamp};
use chainwalk_ports::Clock;
use chrono::Utc;

/// Wall clock for daily production runs
///
/// `today()` is the UTC calendar date, so a run started just after UTC
/// midnight already counts the new day when checking whether an outcome
/// horizon has elapsed. Backfills pin the date with [`crate::FixedClock`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }

    fn today(&self) -> Date {
        Utc::now().date_naive()
    }

    fn name(&self) -> &str {
        "SystemClock"
    }
}
