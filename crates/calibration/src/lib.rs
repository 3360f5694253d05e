//! ChainWalk Outcome Ledger & Calibration
//!
//! The ledger stores one snapshot per date and, once the realized horizon has
//! elapsed, one outcome per date with its structural event label. The
//! calibration engine scores implied probabilities against those labels:
//!
//! - Brier score, globally and per IRQ band
//! - reliability curve over equal-width forecast bins
//! - ROC/AUC for raw CTI, raw MTI, fused pressure and IRQ
//! - honesty check over the gated IRQ bands
//!
//! Every ledger write can be mirrored to an append-only JSONL journal, and
//! replaying the journal rebuilds the ledger.

pub mod calibrator;
pub mod config;
pub mod error;
pub mod events;
pub mod forecast;
pub mod journal;
pub mod ledger;
pub mod metrics;
pub mod report;

pub use calibrator::CalibrationEngine;
pub use config::{
    BandPrior, CalibrationConfig, EventRuleConfig, ForecastConfig, ProbabilityMap, VolThreshold,
};
pub use error::{CalibrationError, JournalError, LedgerError, LedgerResult, Result};
pub use events::EventRule;
pub use forecast::Forecaster;
pub use journal::{Journal, JournalRecord};
pub use ledger::{OutcomeLedger, ResolvedDay, Window};
pub use metrics::{ReliabilityBin, ScoreVariant};
pub use report::{
    BandStats, CalibrationReport, HighVolHits, HonestyCheck, Metric, OutlookReport, WindowReport,
};
