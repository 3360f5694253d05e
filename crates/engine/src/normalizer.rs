//! Normalizer
//!
//! Maps a raw feature set onto canonical domains. Never fills in a missing
//! feature: absent or non-finite inputs fail the date.

use crate::error::{EngineError, Result};
use chainwalk_core::{Feature, FeatureSet, NormalizedFeatures};

/// Custody streak at which `custody_norm` saturates
pub const CUSTODY_NORM_SPAN: f64 = 10.0;

/// Raw CTI scale
pub const CTI_SCALE: f64 = 10.0;

/// Clamp a raw feature set into canonical domains
pub fn normalize(features: &FeatureSet) -> Result<NormalizedFeatures> {
    let value = |feature: Feature| -> Result<f64> {
        let raw = features
            .get(feature)
            .ok_or_else(|| EngineError::missing_feature(feature.as_str()))?;
        if !raw.is_finite() {
            return Err(EngineError::InvalidFeature {
                feature: feature.as_str().to_string(),
                reason: format!("non-finite value {}", raw),
            });
        }
        Ok(raw)
    };

    let cti_raw = value(Feature::ChainTension)?.clamp(0.0, CTI_SCALE);
    let streak_raw = value(Feature::CustodyStreak)?;
    let mti = value(Feature::MinerStress)?.clamp(0.0, 1.0);
    let eti = value(Feature::EpochTension)?.clamp(0.0, 1.0);
    let mempool_intent_delta = value(Feature::MempoolIntentDelta)?.clamp(-1.0, 1.0);
    let entropy_deviation = value(Feature::EntropyDeviation)?.clamp(-1.0, 1.0);
    let custody_direction = features
        .custody_direction
        .ok_or_else(|| EngineError::missing_feature("custody_direction"))?;

    // Float-to-int `as` saturates, so huge streaks land on u32::MAX
    let custody_streak = streak_raw.max(0.0).trunc() as u32;
    let custody_norm = (custody_streak as f64 / CUSTODY_NORM_SPAN).min(1.0);

    Ok(NormalizedFeatures {
        date: features.date,
        block_height: features.block_height,
        cti_raw,
        cti: cti_raw / CTI_SCALE,
        mti,
        eti,
        custody_streak,
        custody_norm,
        custody_direction,
        mempool_intent_delta,
        entropy_deviation,
        context: features.context.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chainwalk_core::{CustodyDirection, Date};

    fn full() -> FeatureSet {
        FeatureSet::new(Date::from_ymd_opt(2025, 12, 8).unwrap(), 927_000)
            .with(Feature::ChainTension, 8.6)
            .with(Feature::CustodyStreak, 12.0)
            .with(Feature::MinerStress, 0.82)
            .with(Feature::EpochTension, 0.41)
            .with(Feature::MempoolIntentDelta, -0.05)
            .with(Feature::EntropyDeviation, 0.01)
            .with_custody(CustodyDirection::Marketward)
    }

    #[test]
    fn test_normalize_scales_cti_and_custody() {
        let n = normalize(&full()).unwrap();
        assert_relative_eq!(n.cti, 0.86, epsilon = 1e-12);
        assert_eq!(n.cti_raw, 8.6);
        assert_eq!(n.custody_streak, 12);
        assert_eq!(n.custody_norm, 1.0);
        assert_eq!(n.custody_direction, CustodyDirection::Marketward);
    }

    #[test]
    fn test_out_of_range_values_clamped() {
        let features = full()
            .with(Feature::ChainTension, 14.0)
            .with(Feature::MinerStress, -0.3)
            .with(Feature::EpochTension, 1.7)
            .with(Feature::CustodyStreak, -4.0);
        let n = normalize(&features).unwrap();
        assert_eq!(n.cti_raw, 10.0);
        assert_eq!(n.cti, 1.0);
        assert_eq!(n.mti, 0.0);
        assert_eq!(n.eti, 1.0);
        assert_eq!(n.custody_streak, 0);
        assert_eq!(n.custody_norm, 0.0);
    }

    #[test]
    fn test_fractional_streak_truncated() {
        let n = normalize(&full().with(Feature::CustodyStreak, 4.9)).unwrap();
        assert_eq!(n.custody_streak, 4);
        assert_relative_eq!(n.custody_norm, 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_feature_fails() {
        let mut features = full();
        features.values.remove(&Feature::MinerStress);
        let err = normalize(&features).unwrap_err();
        assert_eq!(err, EngineError::missing_feature("miner_stress"));
    }

    #[test]
    fn test_missing_custody_direction_fails() {
        let mut features = full();
        features.custody_direction = None;
        assert!(matches!(
            normalize(&features),
            Err(EngineError::InvalidFeature { feature, .. }) if feature == "custody_direction"
        ));
    }

    #[test]
    fn test_non_finite_fails() {
        let features = full().with(Feature::EpochTension, f64::NAN);
        assert!(matches!(
            normalize(&features),
            Err(EngineError::InvalidFeature { .. })
        ));
    }
}
