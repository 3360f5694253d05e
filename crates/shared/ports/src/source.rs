use crate::error::SourceResult;
use chainwalk_core::{Date, FeatureSet, RealizedStats};

/// Supplies already-extracted protocol features for a date.
///
/// Implementations wrap the block/mempool extractors. Calls are one-shot and
/// synchronous from the engine's point of view.
pub trait FeatureSource: Send + Sync {
    /// Feature set for a single date
    fn features(&self, date: Date) -> SourceResult<FeatureSet>;

    /// All dates this source can supply, ascending
    fn available_dates(&self) -> SourceResult<Vec<Date>>;

    /// Source name for logging
    fn name(&self) -> &str;
}

/// Supplies realized-market statistics for a past snapshot date.
///
/// This is the only port through which market-derived numbers enter, and
/// they only ever reach the outcome half of the ledger.
pub trait RealizedStatsSource: Send + Sync {
    /// Realized statistics for `date` over the configured horizon
    fn realized(&self, date: Date) -> SourceResult<RealizedStats>;

    /// Source name for logging
    fn name(&self) -> &str;
}
