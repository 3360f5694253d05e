//! ChainWalk Clock Infrastructure
//!
//! Provides the time sources behind the [`Clock`] port:
//!
//! - [`SystemClock`]: wall-clock UTC, used by daily production runs
//! - [`FixedClock`]: pinned "today" that only moves when told to, used by
//!   backfills (replaying history as of a past date) and tests
//!
//! ## Usage
//!
//! ```ignore
//! use chainwalk_clock::{Clock, FixedClock};
//!
//! let clock = FixedClock::at_date(date);
//! clock.advance_days(3);
//! assert_eq!(clock.today(), date + Duration::days(3));
//! ```

mod fixed;
mod system;

pub use fixed::FixedClock;
pub use system::SystemClock;

// Re-export the Clock trait for convenience
pub use chainwalk_ports::Clock;
