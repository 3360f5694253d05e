//! Regime classification
//!
//! Maps normalized features to exactly one incentive regime. The partition is
//! piecewise-constant in CTI* and the effective custody direction:
//!
//! | CTI*                      | chainward   | neutral     | marketward   |
//! |---------------------------|-------------|-------------|--------------|
//! | ≥ compression_floor       | COMPRESSION | COMPRESSION | STARVATION   |
//! | [ceiling, floor)          | ASCENT      | COMPRESSION | DISTRIBUTION |
//! | < distribution_ceiling    | ASCENT      | DISTRIBUTION| DISTRIBUTION |
//!
//! A custody direction only counts once its streak reaches
//! `min_custody_streak`; below that the flow is treated as neutral.

use crate::config::ClassifierConfig;
use chainwalk_core::{CustodyDirection, NormalizedFeatures, Regime};

/// Classifier port
///
/// Stateless: the same features always yield the same regime. Regime
/// persistence (streaks) is derived from the ledger, not held here.
pub trait RegimeClassifier: Send + Sync {
    /// Classify one day's normalized features
    fn classify(&self, features: &NormalizedFeatures) -> Regime;

    /// Get the model name for logging/debugging
    fn name(&self) -> &str;
}

/// Breakpoint classifier over CTI* and custody direction
#[derive(Debug, Clone)]
pub struct ThresholdClassifier {
    config: ClassifierConfig,
}

impl ThresholdClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Custody direction once the streak requirement is applied
    pub fn effective_direction(&self, features: &NormalizedFeatures) -> CustodyDirection {
        if features.custody_streak >= self.config.min_custody_streak {
            features.custody_direction
        } else {
            CustodyDirection::Neutral
        }
    }
}

impl Default for ThresholdClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

impl RegimeClassifier for ThresholdClassifier {
    fn classify(&self, features: &NormalizedFeatures) -> Regime {
        let direction = self.effective_direction(features);
        let cti = features.cti;

        if cti >= self.config.compression_floor {
            match direction {
                CustodyDirection::Marketward => Regime::Starvation,
                _ => Regime::Compression,
            }
        } else if cti >= self.config.distribution_ceiling {
            match direction {
                CustodyDirection::Chainward => Regime::Ascent,
                CustodyDirection::Marketward => Regime::Distribution,
                CustodyDirection::Neutral => Regime::Compression,
            }
        } else {
            match direction {
                CustodyDirection::Chainward => Regime::Ascent,
                _ => Regime::Distribution,
            }
        }
    }

    fn name(&self) -> &str {
        "ThresholdClassifier"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainwalk_core::{Date, FeatureContext};

    fn features(cti: f64, direction: CustodyDirection, streak: u32) -> NormalizedFeatures {
        NormalizedFeatures {
            date: Date::from_ymd_opt(2025, 12, 8).unwrap(),
            block_height: 927_000,
            cti_raw: cti * 10.0,
            cti,
            mti: 0.5,
            eti: 0.5,
            custody_streak: streak,
            custody_norm: (streak as f64 / 10.0).min(1.0),
            custody_direction: direction,
            mempool_intent_delta: 0.0,
            entropy_deviation: 0.0,
            context: FeatureContext::default(),
        }
    }

    #[test]
    fn test_high_tension() {
        let c = ThresholdClassifier::default();
        assert_eq!(
            c.classify(&features(0.86, CustodyDirection::Marketward, 12)),
            Regime::Starvation
        );
        assert_eq!(
            c.classify(&features(0.86, CustodyDirection::Chainward, 12)),
            Regime::Compression
        );
        assert_eq!(
            c.classify(&features(0.60, CustodyDirection::Neutral, 0)),
            Regime::Compression
        );
    }

    #[test]
    fn test_mid_tension() {
        let c = ThresholdClassifier::default();
        assert_eq!(
            c.classify(&features(0.45, CustodyDirection::Chainward, 3)),
            Regime::Ascent
        );
        assert_eq!(
            c.classify(&features(0.45, CustodyDirection::Marketward, 3)),
            Regime::Distribution
        );
        assert_eq!(
            c.classify(&features(0.45, CustodyDirection::Neutral, 3)),
            Regime::Compression
        );
    }

    #[test]
    fn test_low_tension() {
        let c = ThresholdClassifier::default();
        assert_eq!(
            c.classify(&features(0.10, CustodyDirection::Chainward, 5)),
            Regime::Ascent
        );
        assert_eq!(
            c.classify(&features(0.10, CustodyDirection::Neutral, 5)),
            Regime::Distribution
        );
        assert_eq!(
            c.classify(&features(0.0, CustodyDirection::Marketward, 5)),
            Regime::Distribution
        );
    }

    #[test]
    fn test_unconfirmed_direction_is_neutral() {
        let c = ThresholdClassifier::new(ClassifierConfig {
            min_custody_streak: 3,
            ..ClassifierConfig::default()
        });
        let f = features(0.86, CustodyDirection::Marketward, 2);
        assert_eq!(c.effective_direction(&f), CustodyDirection::Neutral);
        assert_eq!(c.classify(&f), Regime::Compression);
    }

    #[test]
    fn test_partition_is_total_on_a_grid() {
        let c = ThresholdClassifier::default();
        for step in 0..=100 {
            let cti = step as f64 / 100.0;
            for direction in CustodyDirection::ALL {
                for streak in [0, 1, 7, 30] {
                    let regime = c.classify(&features(cti, *direction, streak));
                    assert!(Regime::ALL.contains(&regime));
                }
            }
        }
    }
}
