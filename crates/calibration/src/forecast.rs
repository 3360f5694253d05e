//! Implied probability
//!
//! Maps a snapshot's fused pressure to p̂ ∈ [0,1], optionally blended with a
//! prior keyed by IRQ band. Both parts are non-decreasing in the fused
//! pressure, so p̂ is too.

use crate::config::{ForecastConfig, ProbabilityMap};
use chainwalk_core::{Band, StateVector};

#[derive(Debug, Clone, Default)]
pub struct Forecaster {
    config: ForecastConfig,
}

impl Forecaster {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    /// p̂ for a snapshot
    pub fn implied_probability(&self, state: &StateVector) -> f64 {
        let base = self.map(state.fused_pressure());
        let p = match &self.config.band_prior {
            Some(prior) => {
                let band_p = prior.priors[(state.irq.band.level() as usize).min(3)];
                (1.0 - prior.weight) * base + prior.weight * band_p
            }
            None => base,
        };
        p.clamp(0.0, 1.0)
    }

    /// Pressure part of the forecast
    pub fn map(&self, pressure: f64) -> f64 {
        let p = pressure.clamp(0.0, 1.0);
        let mapped = match self.config.map {
            ProbabilityMap::Linear { floor, span } => floor + span * p,
            ProbabilityMap::Logistic {
                midpoint,
                steepness,
            } => 1.0 / (1.0 + (-steepness * (p - midpoint)).exp()),
        };
        mapped.clamp(0.0, 1.0)
    }
}
