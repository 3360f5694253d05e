//! Ledger and calibration errors

use chainwalk_core::Date;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Snapshot already recorded for {0}")]
    DuplicateDate(Date),

    #[error("No snapshot recorded for {0}")]
    UnknownDate(Date),

    #[error("Horizon for {date} not elapsed: resolvable on {resolvable_on}, today is {today}")]
    HorizonNotElapsed {
        date: Date,
        resolvable_on: Date,
        today: Date,
    },

    /// Zero-day horizons and horizons past the calendar are refused
    #[error("Invalid horizon of {horizon_days} days for {date}")]
    InvalidHorizon { date: Date, horizon_days: u32 },

    #[error("Outcome already resolved for {0}")]
    AlreadyResolved(Date),

    #[error("Realized stats for {found} supplied to resolve {expected}")]
    DateMismatch { expected: Date, found: Date },

    #[error(transparent)]
    Journal(#[from] JournalError),
}

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Journal I/O on {path}: {error}")]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("Journal line {line}: {error}")]
    Parse {
        line: usize,
        error: serde_json::Error,
    },

    #[error("Journal encode: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// Too few resolved records to score; reported as `Bootstrap`
    #[error("Insufficient sample for {metric}: need {needed}, found {found}")]
    InsufficientSample {
        metric: &'static str,
        needed: usize,
        found: usize,
    },

    /// ROC/AUC needs both events and non-events
    #[error("{metric} needs both classes: {events} events, {non_events} non-events")]
    SingleClass {
        metric: &'static str,
        events: usize,
        non_events: usize,
    },

    #[error("Invalid calibration config: {0}")]
    InvalidConfig(String),
}

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;
pub type Result<T> = std::result::Result<T, CalibrationError>;
