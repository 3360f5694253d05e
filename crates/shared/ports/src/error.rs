use thiserror::Error;

/// Errors raised by external collaborators behind a port.
///
/// The core never retries; retry and backoff belong to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed record at {location}: {reason}")]
    Malformed { location: String, reason: String },

    #[error("No data for {0}")]
    NotFound(String),
}

pub type SourceResult<T> = std::result::Result<T, SourceError>;
