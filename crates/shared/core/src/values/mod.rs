use chrono::{DateTime, NaiveDate, Utc};

/// Calendar date a snapshot or outcome is keyed by (UTC)
pub type Date = NaiveDate;

/// Bitcoin block height at snapshot time
pub type BlockHeight = u64;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;
