//! Run configuration
//!
//! One JSON file carries the engine constants, the calibration settings and
//! optionally the expected engine fingerprint:
//!
//! ```json
//! {
//!   "expected_fingerprint": "3f1c…",
//!   "engine": { "irq": { "floor_margin": 0.15 } },
//!   "calibration": { "windows": [60, 90, 180] }
//! }
//! ```

use chainwalk_calibration::CalibrationConfig;
use chainwalk_engine::{ConfigError, EngineConfig};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub engine: EngineConfig,
    pub calibration: CalibrationConfig,
    /// Known-good engine fingerprint; startup fails on drift
    pub expected_fingerprint: Option<String>,
}

impl RunConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        self.calibration
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Engine fingerprint, checked against the expected value when one is set
    pub fn verify_integrity(&self) -> Result<String, ConfigError> {
        let fingerprint = match &self.expected_fingerprint {
            Some(expected) => self.engine.verify_integrity(expected)?,
            None => self.engine.fingerprint()?,
        };
        info!("[RUN] Engine config fingerprint {}", fingerprint);
        Ok(fingerprint)
    }
}
