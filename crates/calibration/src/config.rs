//! Calibration configuration
//!
//! The event rule, the probability map and the scoring windows. Like the
//! engine configuration, every section falls back to its defaults when
//! omitted from the JSON file.

use crate::error::{CalibrationError, Result};
use serde::{Deserialize, Serialize};

/// Volatility threshold for the structural event label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VolThreshold {
    /// Fixed realized volatility
    Absolute { value: f64 },
    /// Percentile of the volatilities of previously resolved dates, falling
    /// back to `fallback` until `min_samples` of them exist
    Percentile {
        pct: f64,
        min_samples: usize,
        fallback: f64,
    },
}

impl Default for VolThreshold {
    fn default() -> Self {
        VolThreshold::Absolute { value: 0.06 }
    }
}

/// When a resolved day counts as a structural event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventRuleConfig {
    pub vol_threshold: VolThreshold,
    /// |return| a miner unwind needs to count as material
    pub material_move: f64,
    /// Returns inside ± this are `flat`
    pub direction_dead_band: f64,
}

impl Default for EventRuleConfig {
    fn default() -> Self {
        Self {
            vol_threshold: VolThreshold::default(),
            material_move: 0.03,
            direction_dead_band: 0.002,
        }
    }
}

/// Map from fused pressure to a pseudo-probability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProbabilityMap {
    /// p = floor + span · P
    Linear { floor: f64, span: f64 },
    /// p = 1 / (1 + e^(−steepness · (P − midpoint)))
    Logistic { midpoint: f64, steepness: f64 },
}

impl Default for ProbabilityMap {
    fn default() -> Self {
        ProbabilityMap::Linear {
            floor: 0.1,
            span: 0.8,
        }
    }
}

/// Optional blend with a per-IRQ-band prior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandPrior {
    /// λ: weight of the prior in the blend
    pub weight: f64,
    /// Prior per IRQ band, least to most severe; must be non-decreasing
    pub priors: [f64; 4],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub map: ProbabilityMap,
    pub band_prior: Option<BandPrior>,
}

/// Configuration for the outcome ledger and scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Resolved records a metric needs before it is scored
    pub min_samples: usize,
    /// Trailing windows reported, in days
    pub windows: Vec<u32>,
    /// Equal-width reliability bins
    pub reliability_bins: usize,
    /// Days the regime outlook is propagated
    pub outlook_days: u32,
    /// Raw CTI at which a pressure-regime day is flagged high-vol
    pub high_vol_cti: f64,
    pub events: EventRuleConfig,
    pub forecast: ForecastConfig,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            min_samples: 10,
            windows: vec![60, 90, 180],
            reliability_bins: 5,
            outlook_days: 7,
            high_vol_cti: 5.0,
            events: EventRuleConfig::default(),
            forecast: ForecastConfig::default(),
        }
    }
}

/// Longest trailing window accepted, in days
pub const MAX_WINDOW_DAYS: u32 = 36_500;

impl CalibrationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_samples == 0 {
            return Err(invalid("min_samples must be at least 1"));
        }
        if self.windows.is_empty() || self.windows.contains(&0) {
            return Err(invalid("windows must be non-empty and positive"));
        }
        if let Some(days) = self.windows.iter().find(|d| **d > MAX_WINDOW_DAYS) {
            return Err(invalid(&format!(
                "window of {} days exceeds {} days",
                days, MAX_WINDOW_DAYS
            )));
        }
        if self.reliability_bins == 0 {
            return Err(invalid("reliability_bins must be at least 1"));
        }

        match &self.events.vol_threshold {
            VolThreshold::Absolute { value } if *value <= 0.0 => {
                return Err(invalid("absolute vol threshold must be positive"));
            }
            VolThreshold::Percentile { pct, fallback, .. }
                if !(0.0..=100.0).contains(pct) || *fallback <= 0.0 =>
            {
                return Err(invalid(
                    "percentile must lie in [0, 100] with a positive fallback",
                ));
            }
            _ => {}
        }
        if self.events.material_move < 0.0 || self.events.direction_dead_band < 0.0 {
            return Err(invalid("material_move and direction_dead_band must be >= 0"));
        }

        match &self.forecast.map {
            ProbabilityMap::Linear { floor, span } => {
                if *floor < 0.0 || *span <= 0.0 || floor + span > 1.0 {
                    return Err(invalid("linear map must stay inside [0, 1] and increase"));
                }
            }
            ProbabilityMap::Logistic { steepness, .. } => {
                if *steepness <= 0.0 {
                    return Err(invalid("logistic steepness must be positive"));
                }
            }
        }
        if let Some(prior) = &self.forecast.band_prior {
            let in_unit = prior.priors.iter().all(|p| (0.0..=1.0).contains(p));
            let ordered = prior.priors.windows(2).all(|w| w[0] <= w[1]);
            if !(0.0..=1.0).contains(&prior.weight) || !in_unit || !ordered {
                return Err(invalid(
                    "band prior needs a weight in [0, 1] and non-decreasing priors in [0, 1]",
                ));
            }
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> CalibrationError {
    CalibrationError::InvalidConfig(reason.to_string())
}
