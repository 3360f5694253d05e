//! Input fingerprints
//!
//! The feature fingerprint (oracle input hash) is a SHA-256 over the
//! canonical JSON of the raw feature set. Feature values are held in a
//! `BTreeMap` and struct fields serialize in declaration order, so the same
//! feature set always hashes to the same digest.

use crate::error::{EngineError, Result};
use chainwalk_core::FeatureSet;
use sha2::{Digest, Sha256};

/// SHA-256 (hex) of the canonical feature set
pub fn feature_fingerprint(features: &FeatureSet) -> Result<String> {
    let bytes =
        serde_json::to_vec(features).map_err(|e| EngineError::Fingerprint(e.to_string()))?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}
