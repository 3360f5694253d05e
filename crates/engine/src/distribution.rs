//! Regime distribution and outlook
//!
//! A categorical distribution over the four regimes. Today's distribution is
//! a softmax over per-regime affinities; the outlook propagates it through a
//! transition matrix estimated from the ledger's regime sequence.

use crate::config::DistributionConfig;
use chainwalk_core::{CustodyDirection, NormalizedFeatures, Regime};
use serde::{Deserialize, Serialize};

const N: usize = 4;

/// Probability per regime, indexed by [`Regime::index`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeDistribution {
    probs: [f64; N],
}

impl RegimeDistribution {
    /// Normalize non-negative weights; all-zero weights become uniform
    pub fn from_weights(weights: [f64; N]) -> Self {
        let clean = weights.map(|w| if w.is_finite() && w > 0.0 { w } else { 0.0 });
        let total: f64 = clean.iter().sum();
        if total <= 0.0 {
            return Self { probs: [1.0 / N as f64; N] };
        }
        Self {
            probs: clean.map(|w| w / total),
        }
    }

    /// All mass on one regime
    pub fn certain(regime: Regime) -> Self {
        let mut probs = [0.0; N];
        probs[regime.index()] = 1.0;
        Self { probs }
    }

    /// Softmax of scores at a temperature
    pub fn softmax(scores: [f64; N], temperature: f64) -> Self {
        let t = temperature.max(f64::EPSILON);
        let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        Self::from_weights(scores.map(|s| ((s - max) / t).exp()))
    }

    pub fn probability(&self, regime: Regime) -> f64 {
        self.probs[regime.index()]
    }

    /// E[f(R)]
    pub fn expectation(&self, f: impl Fn(Regime) -> f64) -> f64 {
        Regime::ALL
            .iter()
            .map(|r| self.probability(*r) * f(*r))
            .sum()
    }

    /// Most probable regime (earliest declared on ties)
    pub fn mode(&self) -> Regime {
        let mut best = Regime::ALL[0];
        for regime in Regime::ALL {
            if self.probability(*regime) > self.probability(best) {
                best = *regime;
            }
        }
        best
    }

    /// Lead of the most probable regime over the runner-up
    pub fn spread(&self) -> f64 {
        let mut sorted = self.probs;
        sorted.sort_by(|a, b| b.total_cmp(a));
        sorted[0] - sorted[1]
    }
}

/// Where the distribution is heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outlook {
    /// No regime leads by more than the coil spread
    Coil,
    /// One regime leads
    Biased(Regime),
}

impl std::fmt::Display for Outlook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outlook::Coil => write!(f, "coil"),
            Outlook::Biased(regime) => write!(f, "biased({})", regime),
        }
    }
}

/// Row-stochastic regime transition matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionMatrix {
    rows: [[f64; N]; N],
}

impl TransitionMatrix {
    /// Laplace-smoothed estimate from consecutive regimes
    pub fn estimate(sequence: &[Regime], smoothing: f64) -> Self {
        let mut counts = [[smoothing.max(0.0); N]; N];
        for pair in sequence.windows(2) {
            counts[pair[0].index()][pair[1].index()] += 1.0;
        }
        let rows = counts.map(|row| {
            let total: f64 = row.iter().sum();
            if total > 0.0 {
                row.map(|c| c / total)
            } else {
                [1.0 / N as f64; N]
            }
        });
        Self { rows }
    }

    pub fn probability(&self, from: Regime, to: Regime) -> f64 {
        self.rows[from.index()][to.index()]
    }

    /// One step: p'_j = Σ_i p_i · T_ij
    pub fn step(&self, dist: &RegimeDistribution) -> RegimeDistribution {
        let mut next = [0.0; N];
        for (i, row) in self.rows.iter().enumerate() {
            for (j, t) in row.iter().enumerate() {
                next[j] += dist.probs[i] * t;
            }
        }
        RegimeDistribution::from_weights(next)
    }

    pub fn propagate(&self, dist: &RegimeDistribution, days: u32) -> RegimeDistribution {
        (0..days).fold(*dist, |d, _| self.step(&d))
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegimeOutlook {
    config: DistributionConfig,
}

impl RegimeOutlook {
    pub fn new(config: DistributionConfig) -> Self {
        Self { config }
    }

    /// Affinity of today's features for each regime, mirroring the classifier
    /// partition: tension splits stored from released, custody picks the side.
    pub fn scores(&self, features: &NormalizedFeatures) -> [f64; N] {
        let cti = features.cti;
        let (market, chain) = match features.custody_direction {
            CustodyDirection::Marketward => (features.custody_norm, 0.0),
            CustodyDirection::Chainward => (0.0, features.custody_norm),
            CustodyDirection::Neutral => (0.0, 0.0),
        };
        let mut scores = [0.0; N];
        scores[Regime::Compression.index()] = cti * (1.0 - market);
        scores[Regime::Starvation.index()] = cti * market;
        scores[Regime::Ascent.index()] = chain * (1.0 - 0.5 * cti);
        scores[Regime::Distribution.index()] = (1.0 - cti) * (1.0 - chain);
        scores
    }

    pub fn distribution(&self, features: &NormalizedFeatures) -> RegimeDistribution {
        RegimeDistribution::softmax(self.scores(features), self.config.temperature)
    }

    pub fn transitions(&self, sequence: &[Regime]) -> TransitionMatrix {
        TransitionMatrix::estimate(sequence, self.config.smoothing)
    }

    pub fn classify(&self, dist: &RegimeDistribution) -> Outlook {
        if dist.spread() < self.config.coil_spread {
            Outlook::Coil
        } else {
            Outlook::Biased(dist.mode())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_softmax_sums_to_one_and_orders() {
        let d = RegimeDistribution::softmax([1.0, 0.2, 0.5, 0.0], 0.25);
        let total: f64 = Regime::ALL.iter().map(|r| d.probability(*r)).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
        assert_eq!(d.mode(), Regime::Compression);
        assert!(d.probability(Regime::Starvation) > d.probability(Regime::Ascent));
    }

    #[test]
    fn test_expectation() {
        let d = RegimeDistribution::from_weights([1.0, 1.0, 0.0, 0.0]);
        let e = d.expectation(|r| if r.is_pressure() { 1.0 } else { 0.0 });
        assert_relative_eq!(e, 0.5);
    }

    #[test]
    fn test_transition_matrix_rows_stochastic() {
        let seq = [
            Regime::Compression,
            Regime::Compression,
            Regime::Starvation,
            Regime::Starvation,
            Regime::Distribution,
        ];
        let t = TransitionMatrix::estimate(&seq, 1.0);
        for from in Regime::ALL {
            let row: f64 = Regime::ALL.iter().map(|to| t.probability(*from, *to)).sum();
            assert_relative_eq!(row, 1.0, epsilon = 1e-12);
        }
        // 1 observed + 1 pseudo-count over 2 observed + 4
        assert_relative_eq!(
            t.probability(Regime::Compression, Regime::Starvation),
            1.0 / 3.0,
            epsilon = 1e-12
        );
        // Never-left row is uniform
        assert_relative_eq!(t.probability(Regime::Ascent, Regime::Ascent), 0.25);
    }

    #[test]
    fn test_propagation_converges_to_coil_without_evidence() {
        let outlook = RegimeOutlook::default();
        let t = outlook.transitions(&[]);
        let d = t.propagate(&RegimeDistribution::certain(Regime::Starvation), 3);
        assert_relative_eq!(d.probability(Regime::Ascent), 0.25, epsilon = 1e-12);
        assert_eq!(outlook.classify(&d), Outlook::Coil);
        assert_eq!(
            outlook.classify(&RegimeDistribution::certain(Regime::Ascent)),
            Outlook::Biased(Regime::Ascent)
        );
    }
}
