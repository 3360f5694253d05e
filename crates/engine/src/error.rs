//! Engine errors

use chainwalk_core::{Date, UnknownLabel};
use thiserror::Error;

/// Per-date computation failures. Either aborts the run for that date only.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid feature {feature}: {reason}")]
    InvalidFeature { feature: String, reason: String },

    #[error("Incomplete snapshot for {date}: missing {part}")]
    IncompleteSnapshot { date: Date, part: &'static str },

    #[error("Fingerprint failed: {0}")]
    Fingerprint(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl EngineError {
    pub fn missing_feature(feature: impl Into<String>) -> Self {
        EngineError::InvalidFeature {
            feature: feature.into(),
            reason: "required feature absent".to_string(),
        }
    }
}

/// Configuration loading, validation and integrity failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Config integrity mismatch: expected {expected}, running {actual}")]
    IntegrityMismatch { expected: String, actual: String },
}

/// A spine line that does not follow the canonical grammar
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpineError {
    #[error("Unexpected spine header: {0:?}")]
    Header(String),

    #[error("Missing spine field {0}")]
    MissingField(&'static str),

    #[error("Malformed spine field {field}: {token:?}")]
    Malformed { field: &'static str, token: String },

    #[error("Unexpected trailing spine field: {0:?}")]
    Trailing(String),

    #[error(transparent)]
    Label(#[from] UnknownLabel),
}

/// A rendered surface disagrees with the canonical spine line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Surface {surface} disagrees on {field}: canonical {expected:?}, rendered {found:?}")]
pub struct SurfaceMismatch {
    pub surface: String,
    pub field: String,
    pub expected: String,
    pub found: String,
}

pub type Result<T> = std::result::Result<T, EngineError>;
