//! Resolution-proximity index (REI)
//!
//! How close the current regime is to resolving: the further along the
//! regime clock or the more exhausted the intent clock, the closer. Fused
//! with regime-weighted tension exactly like the IRQ, and gated the same way.

use crate::config::{RegimeTable, ReiConfig};
use crate::fusion::{FusedGate, Ladder};
use chainwalk_core::{
    Band, FusedIndex, FusedReading, IntentClock, IrqBand, Regime, RegimeClock, ReiBand,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReiInputs {
    pub regime: Regime,
    /// CTI* on [0,1]
    pub cti: f64,
    pub regime_clock: RegimeClock,
    pub intent_clock: IntentClock,
    /// IRQ band already assigned for the day
    pub irq_band: IrqBand,
}

#[derive(Debug, Clone)]
pub struct ResolutionEngine {
    config: ReiConfig,
    weights: RegimeTable<f64>,
}

impl ResolutionEngine {
    pub fn new(config: ReiConfig, weights: RegimeTable<f64>) -> Self {
        Self { config, weights }
    }

    /// max(regime-clock progress, intent exhaustion)
    pub fn proximity(&self, inputs: &ReiInputs) -> f64 {
        inputs
            .regime_clock
            .progress()
            .max(inputs.intent_clock.exhaustion())
    }

    pub fn fused_pressure(&self, inputs: &ReiInputs) -> f64 {
        (self.weights.get(inputs.regime) * inputs.cti.clamp(0.0, 1.0) * self.proximity(inputs))
            .clamp(0.0, 1.0)
    }

    pub fn gate(&self) -> FusedGate {
        FusedGate::new(FusedIndex::Rei, Ladder::identity(self.config.thresholds))
    }

    pub fn compute(&self, inputs: &ReiInputs) -> FusedReading<ReiBand> {
        let pressure = self.fused_pressure(inputs);
        // `triggered` also needs the IRQ past the point of no return and
        // intent patience fully spent
        let max_level =
            if inputs.irq_band >= IrqBand::Irreversible && inputs.intent_clock.is_exhausted() {
                ReiBand::Triggered.level()
            } else {
                ReiBand::Imminent.level()
            };
        self.gate()
            .settle(pressure, self.config.thresholds[1], max_level, inputs.regime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IrqConfig, ReiConfig};
    use chainwalk_core::{IntentState, RegimePhase};

    fn engine() -> ResolutionEngine {
        ResolutionEngine::new(ReiConfig::default(), IrqConfig::default().weights)
    }

    fn inputs(regime: Regime, streak: u32, intent_remaining: u32, irq_band: IrqBand) -> ReiInputs {
        ReiInputs {
            regime,
            cti: 0.9,
            regime_clock: RegimeClock {
                streak_days: streak,
                phase: RegimePhase::Late,
                min_remaining: 40u32.saturating_sub(streak),
                max_remaining: 70u32.saturating_sub(streak),
                max_total: 70,
            },
            intent_clock: IntentClock {
                state: IntentState::Bleeding,
                streak_days: 15 - intent_remaining.min(15),
                half_life_days: 15,
                days_remaining: intent_remaining,
            },
            irq_band,
        }
    }

    #[test]
    fn test_fresh_regime_is_dormant() {
        let reading = engine().compute(&inputs(Regime::Compression, 1, 15, IrqBand::Primed));
        assert_eq!(reading.band, ReiBand::Dormant);
    }

    #[test]
    fn test_triggered_requires_irq_and_exhausted_intent() {
        let e = engine();
        let full = e.compute(&inputs(Regime::Compression, 70, 0, IrqBand::Irreversible));
        assert_eq!(full.band, ReiBand::Triggered);

        let no_irq = e.compute(&inputs(Regime::Compression, 70, 0, IrqBand::Primed));
        assert_eq!(no_irq.band, ReiBand::Imminent);
        assert!(no_irq.value < 0.78);
    }

    #[test]
    fn test_gated_outside_pressure() {
        let reading = engine().compute(&inputs(Regime::Ascent, 70, 0, IrqBand::Primed));
        assert_eq!(reading.band, ReiBand::Charged);
    }

    #[test]
    fn test_intent_exhaustion_drives_proximity() {
        let e = engine();
        let i = inputs(Regime::Starvation, 2, 0, IrqBand::Primed);
        assert_eq!(e.proximity(&i), 1.0);
    }
}
