//! Structural event labelling
//!
//! E = 1 when, within the horizon, realized volatility reached the threshold,
//! the regime broke, custody flipped, or miner stress unwound together with a
//! material move. Realized statistics are taken as supplied.

use crate::config::{EventRuleConfig, VolThreshold};
use chainwalk_core::{RealizedDirection, RealizedStats};

#[derive(Debug, Clone, Default)]
pub struct EventRule {
    config: EventRuleConfig,
}

impl EventRule {
    pub fn new(config: EventRuleConfig) -> Self {
        Self { config }
    }

    /// Volatility threshold given the volatilities resolved before this date
    pub fn vol_threshold(&self, prior_vols: &[f64]) -> f64 {
        match &self.config.vol_threshold {
            VolThreshold::Absolute { value } => *value,
            VolThreshold::Percentile {
                pct,
                min_samples,
                fallback,
            } => {
                if prior_vols.len() < *min_samples {
                    *fallback
                } else {
                    percentile(prior_vols, *pct).unwrap_or(*fallback)
                }
            }
        }
    }

    pub fn direction(&self, stats: &RealizedStats) -> RealizedDirection {
        RealizedDirection::from_return(stats.realized_return, self.config.direction_dead_band)
    }

    pub fn is_event(&self, stats: &RealizedStats, vol_threshold: f64) -> bool {
        let material_unwind = stats.miner_stress_unwound
            && stats.realized_return.abs() >= self.config.material_move;

        stats.realized_vol >= vol_threshold
            || stats.regime_break
            || stats.custody_flip
            || material_unwind
    }
}

/// Percentile (0–100) with linear interpolation between closest ranks
pub fn percentile(values: &[f64], pct: f64) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (pct.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}
