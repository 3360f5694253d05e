//! Runner errors

use chainwalk_calibration::{CalibrationError, JournalError, LedgerError};
use chainwalk_engine::{ConfigError, EngineError, SurfaceMismatch};
use chainwalk_ports::SourceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Journal(#[from] JournalError),

    #[error(transparent)]
    Calibration(#[from] CalibrationError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Fail-closed: nothing is published or recorded for the date
    #[error("Run rejected: {0}")]
    SurfaceMismatch(#[from] SurfaceMismatch),

    #[error("Worker task failed: {0}")]
    Join(String),
}

pub type Result<T> = std::result::Result<T, RunError>;
