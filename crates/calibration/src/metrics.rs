//! Scoring functions
//!
//! Pure functions over (forecast or score, event) pairs. Sample-size policy
//! lives with the caller; these only refuse what is mathematically undefined.

use chainwalk_core::StateVector;
use serde::{Deserialize, Serialize};

/// Which number a ROC sweep ranks days by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreVariant {
    RawCti,
    RawMti,
    FusedPressure,
    Irq,
}

impl ScoreVariant {
    pub const ALL: [ScoreVariant; 4] = [
        ScoreVariant::RawCti,
        ScoreVariant::RawMti,
        ScoreVariant::FusedPressure,
        ScoreVariant::Irq,
    ];

    pub fn score(&self, state: &StateVector) -> f64 {
        match self {
            ScoreVariant::RawCti => state.pressure.cti.raw,
            ScoreVariant::RawMti => state.pressure.mti.raw,
            ScoreVariant::FusedPressure => state.fused_pressure(),
            ScoreVariant::Irq => state.irq.value,
        }
    }
}

impl std::fmt::Display for ScoreVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ScoreVariant::RawCti => "raw CTI",
            ScoreVariant::RawMti => "raw MTI",
            ScoreVariant::FusedPressure => "fused P",
            ScoreVariant::Irq => "IRQ",
        };
        f.write_str(name)
    }
}

/// Mean squared error between forecast and outcome
pub fn brier(forecasts: &[(f64, bool)]) -> Option<f64> {
    if forecasts.is_empty() {
        return None;
    }
    let total: f64 = forecasts
        .iter()
        .map(|(p, e)| {
            let e = if *e { 1.0 } else { 0.0 };
            (p - e).powi(2)
        })
        .sum();
    Some(total / forecasts.len() as f64)
}

/// One equal-width forecast bin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityBin {
    pub low: f64,
    pub high: f64,
    pub count: usize,
    pub mean_forecast: f64,
    pub event_rate: f64,
}

/// Group forecasts into `n_bins` equal-width bins on [0,1]; empty bins are
/// omitted. A forecast of exactly 1 lands in the top bin.
pub fn reliability_curve(forecasts: &[(f64, bool)], n_bins: usize) -> Vec<ReliabilityBin> {
    let n_bins = n_bins.max(1);
    let width = 1.0 / n_bins as f64;
    let mut sums = vec![(0usize, 0.0f64, 0usize); n_bins];

    for (p, e) in forecasts {
        let p = p.clamp(0.0, 1.0);
        let idx = ((p / width) as usize).min(n_bins - 1);
        let bin = &mut sums[idx];
        bin.0 += 1;
        bin.1 += p;
        bin.2 += *e as usize;
    }

    sums.iter()
        .enumerate()
        .filter(|(_, (count, _, _))| *count > 0)
        .map(|(i, (count, p_sum, events))| ReliabilityBin {
            low: i as f64 * width,
            high: ((i + 1) as f64 * width).min(1.0),
            count: *count,
            mean_forecast: p_sum / *count as f64,
            event_rate: *events as f64 / *count as f64,
        })
        .collect()
}

/// Area under the ROC curve swept over `score`.
///
/// Computed as the probability that a random event day outranks a random
/// non-event day, ties counting half, which equals the trapezoidal area under
/// the step curve. `None` when either class is missing.
pub fn roc_auc(scored: &[(f64, bool)]) -> Option<f64> {
    let positives: Vec<f64> = scored.iter().filter(|(_, e)| *e).map(|(s, _)| *s).collect();
    let negatives: Vec<f64> = scored.iter().filter(|(_, e)| !*e).map(|(s, _)| *s).collect();
    if positives.is_empty() || negatives.is_empty() {
        return None;
    }

    let mut wins = 0.0;
    for p in &positives {
        for n in &negatives {
            if p > n {
                wins += 1.0;
            } else if p == n {
                wins += 0.5;
            }
        }
    }
    Some(wins / (positives.len() * negatives.len()) as f64)
}
