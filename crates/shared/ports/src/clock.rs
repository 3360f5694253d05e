use chainwalk_core::{Date, Timestamp};

/// Port for time abstraction
///
/// Outcome resolution asks the clock whether a horizon has elapsed, so
/// backfills and tests can pin "today" while production uses wall time.
pub trait Clock: Send + Sync {
    /// Get the current time according to this clock
    fn now(&self) -> Timestamp;

    /// Current UTC calendar date
    fn today(&self) -> Date {
        self.now().date_naive()
    }

    /// Get the clock's name/identifier for debugging
    fn name(&self) -> &str {
        "Clock"
    }
}
