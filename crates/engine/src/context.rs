//! Context states: entropy drift, price corridor, hashrate band
//!
//! The corridor is structural: it reads custody, entropy and tension only,
//! never a quoted price.

use crate::config::ContextConfig;
use chainwalk_core::{CustodyDirection, EntropyState, HashrateBand, PriceCorridor};

#[derive(Debug, Clone, Default)]
pub struct ContextEngine {
    config: ContextConfig,
}

impl ContextEngine {
    pub fn new(config: ContextConfig) -> Self {
        Self { config }
    }

    pub fn entropy_state(&self, deviation: f64) -> EntropyState {
        if deviation > self.config.entropy_band {
            EntropyState::Rising
        } else if deviation < -self.config.entropy_band {
            EntropyState::Falling
        } else {
            EntropyState::Flat
        }
    }

    pub fn corridor(
        &self,
        direction: CustodyDirection,
        entropy: EntropyState,
        cti_raw: f64,
    ) -> PriceCorridor {
        match direction {
            CustodyDirection::Chainward
                if entropy == EntropyState::Falling
                    && cti_raw >= self.config.corridor_forbidden_cti =>
            {
                PriceCorridor::Forbidden
            }
            CustodyDirection::Chainward => PriceCorridor::Fragile,
            _ => PriceCorridor::Permitted,
        }
    }

    pub fn hashrate_band(&self, stress: f64) -> HashrateBand {
        if stress >= self.config.hashrate_distress {
            HashrateBand::Distress
        } else if stress >= self.config.hashrate_strained {
            HashrateBand::Strained
        } else {
            HashrateBand::Calm
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entropy_dead_band() {
        let ctx = ContextEngine::default();
        assert_eq!(ctx.entropy_state(0.06), EntropyState::Rising);
        assert_eq!(ctx.entropy_state(0.05), EntropyState::Flat);
        assert_eq!(ctx.entropy_state(-0.2), EntropyState::Falling);
    }

    #[test]
    fn test_corridor() {
        let ctx = ContextEngine::default();
        assert_eq!(
            ctx.corridor(CustodyDirection::Chainward, EntropyState::Falling, 6.5),
            PriceCorridor::Forbidden
        );
        assert_eq!(
            ctx.corridor(CustodyDirection::Chainward, EntropyState::Rising, 6.5),
            PriceCorridor::Fragile
        );
        assert_eq!(
            ctx.corridor(CustodyDirection::Marketward, EntropyState::Falling, 9.0),
            PriceCorridor::Permitted
        );
    }

    #[test]
    fn test_hashrate_band() {
        let ctx = ContextEngine::default();
        assert_eq!(ctx.hashrate_band(0.1), HashrateBand::Calm);
        assert_eq!(ctx.hashrate_band(0.3), HashrateBand::Strained);
        assert_eq!(ctx.hashrate_band(0.82), HashrateBand::Distress);
    }
}
