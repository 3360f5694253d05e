//! Realized outcomes
//!
//! Realized statistics are supplied by an external collaborator after the
//! horizon has elapsed. They are the only place market-derived numbers enter
//! the system, and they only ever land in the outcome half of the ledger.

use super::labels::labelled_enum;
use crate::values::Date;
use serde::{Deserialize, Serialize};

labelled_enum! {
    /// Sign of the realized move over the horizon
    pub enum RealizedDirection {
        Down => "down",
        Flat => "flat",
        Up => "up",
    }
}

impl RealizedDirection {
    /// Classify a return with a symmetric dead band
    pub fn from_return(ret: f64, dead_band: f64) -> Self {
        if ret > dead_band {
            RealizedDirection::Up
        } else if ret < -dead_band {
            RealizedDirection::Down
        } else {
            RealizedDirection::Flat
        }
    }
}

/// Realized-market summary for one snapshot date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RealizedStats {
    /// Snapshot date the statistics refer to
    pub date: Date,
    /// Days after `date` the statistics cover
    pub horizon_days: u32,
    /// Realized volatility over the horizon
    pub realized_vol: f64,
    /// Realized return over the horizon
    pub realized_return: f64,
    /// The regime changed within the horizon
    #[serde(default)]
    pub regime_break: bool,
    /// Custody direction flipped within the horizon
    #[serde(default)]
    pub custody_flip: bool,
    /// Miner stress unwound within the horizon
    #[serde(default)]
    pub miner_stress_unwound: bool,
}

impl RealizedStats {
    /// Last date covered by these statistics.
    ///
    /// `None` for an empty horizon (an outcome must be observed strictly
    /// after its date) or one that runs past the calendar.
    pub fn horizon_end(&self) -> Option<Date> {
        if self.horizon_days == 0 {
            return None;
        }
        self.date
            .checked_add_days(chrono::Days::new(self.horizon_days as u64))
    }
}

/// Resolved outcome joined to a ledger date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub date: Date,
    /// Date the record was written
    pub resolved_on: Date,
    pub stats: RealizedStats,
    pub direction: RealizedDirection,
    /// Volatility threshold in force when the label was derived
    pub vol_threshold: f64,
    /// Structural event label E
    pub event: bool,
}

impl OutcomeRecord {
    /// E as 0.0 / 1.0
    pub fn event_value(&self) -> f64 {
        if self.event { 1.0 } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_dead_band() {
        assert_eq!(RealizedDirection::from_return(0.01, 0.002), RealizedDirection::Up);
        assert_eq!(RealizedDirection::from_return(-0.01, 0.002), RealizedDirection::Down);
        assert_eq!(RealizedDirection::from_return(0.001, 0.002), RealizedDirection::Flat);
    }

    #[test]
    fn test_horizon_end() {
        let mut stats = RealizedStats {
            date: Date::from_ymd_opt(2025, 12, 30).unwrap(),
            horizon_days: 3,
            realized_vol: 0.04,
            realized_return: 0.0,
            regime_break: false,
            custody_flip: false,
            miner_stress_unwound: false,
        };
        assert_eq!(stats.horizon_end(), Date::from_ymd_opt(2026, 1, 2));

        stats.horizon_days = 0;
        assert_eq!(stats.horizon_end(), None);

        stats.horizon_days = u32::MAX;
        assert_eq!(stats.horizon_end(), None);
    }
}
