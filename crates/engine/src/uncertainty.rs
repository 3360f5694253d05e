//! Remaining-futures index (UQI)
//!
//! Counts how many independent constraints are already binding. Each bound
//! constraint removes one possible future; the fused pressure is the
//! regime-weighted share of constraints bound.

use crate::config::{RegimeTable, UqiConfig};
use crate::fusion::{FusedGate, Ladder};
use chainwalk_core::{
    CtiBand, EtiBand, FusedIndex, FusedReading, IntentClock, IrqBand, MtiBand, PressureIndices,
    Regime, UqiBand,
};

/// Number of independent constraints the UQI tracks
pub const CONSTRAINT_COUNT: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UqiInputs<'a> {
    pub regime: Regime,
    pub pressure: &'a PressureIndices,
    pub custody_streak: u32,
    pub custody_directed: bool,
    pub irq_band: IrqBand,
    pub intent_clock: IntentClock,
}

/// UQI reading plus the unbound constraint count
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UqiReading {
    pub reading: FusedReading<UqiBand>,
    pub remaining_futures: u32,
}

#[derive(Debug, Clone)]
pub struct UncertaintyEngine {
    config: UqiConfig,
    weights: RegimeTable<f64>,
}

impl UncertaintyEngine {
    pub fn new(config: UqiConfig, weights: RegimeTable<f64>) -> Self {
        Self { config, weights }
    }

    /// Constraints currently binding
    pub fn bound_constraints(&self, inputs: &UqiInputs<'_>) -> u32 {
        let bound = [
            inputs.pressure.cti.band >= CtiBand::Coil,
            inputs.pressure.mti.band >= MtiBand::Strained,
            inputs.pressure.eti.band == EtiBand::Overclocked,
            inputs.custody_directed && inputs.custody_streak >= self.config.custody_streak_bound,
            inputs.irq_band >= IrqBand::Primed,
            inputs.intent_clock.is_exhausted(),
        ];
        bound.iter().filter(|b| **b).count() as u32
    }

    pub fn gate(&self) -> FusedGate {
        FusedGate::new(FusedIndex::Uqi, Ladder::identity(self.config.thresholds))
    }

    pub fn compute(&self, inputs: &UqiInputs<'_>) -> UqiReading {
        let bound = self.bound_constraints(inputs);
        let share = bound as f64 / CONSTRAINT_COUNT as f64;
        let pressure = self.weights.get(inputs.regime) * share;
        let reading = self.gate().settle(
            pressure,
            self.config.thresholds[1],
            u8::MAX,
            inputs.regime,
        );
        UqiReading {
            reading,
            remaining_futures: CONSTRAINT_COUNT - bound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IrqConfig;
    use chainwalk_core::{IndexReading, IntentState};

    fn pressure(cti: CtiBand, mti: MtiBand, eti: EtiBand) -> PressureIndices {
        PressureIndices {
            cti: IndexReading { raw: 8.0, normalized: 0.8, band: cti },
            mti: IndexReading { raw: 0.8, normalized: 0.8, band: mti },
            eti: IndexReading { raw: 0.9, normalized: 0.9, band: eti },
        }
    }

    fn intent(days_remaining: u32) -> IntentClock {
        IntentClock {
            state: IntentState::Purge,
            streak_days: 15 - days_remaining,
            half_life_days: 15,
            days_remaining,
        }
    }

    fn engine() -> UncertaintyEngine {
        UncertaintyEngine::new(UqiConfig::default(), IrqConfig::default().weights)
    }

    #[test]
    fn test_everything_bound_is_terminal() {
        let p = pressure(CtiBand::Break, MtiBand::Forced, EtiBand::Overclocked);
        let inputs = UqiInputs {
            regime: Regime::Compression,
            pressure: &p,
            custody_streak: 12,
            custody_directed: true,
            irq_band: IrqBand::Irreversible,
            intent_clock: intent(0),
        };
        let out = engine().compute(&inputs);
        assert_eq!(out.remaining_futures, 0);
        assert_eq!(out.reading.band, UqiBand::Terminal);
        assert_eq!(out.reading.value, 1.0);
    }

    #[test]
    fn test_nothing_bound_is_open() {
        let p = pressure(CtiBand::Relaxed, MtiBand::Normal, EtiBand::Relaxed);
        let inputs = UqiInputs {
            regime: Regime::Compression,
            pressure: &p,
            custody_streak: 12,
            custody_directed: false,
            irq_band: IrqBand::Reversible,
            intent_clock: intent(9),
        };
        let out = engine().compute(&inputs);
        assert_eq!(out.remaining_futures, CONSTRAINT_COUNT);
        assert_eq!(out.reading.band, UqiBand::Open);
    }

    #[test]
    fn test_terminal_gated_outside_pressure() {
        let p = pressure(CtiBand::Coil, MtiBand::Strained, EtiBand::Overclocked);
        let inputs = UqiInputs {
            regime: Regime::Distribution,
            pressure: &p,
            custody_streak: 30,
            custody_directed: true,
            irq_band: IrqBand::Primed,
            intent_clock: intent(0),
        };
        let out = engine().compute(&inputs);
        assert_eq!(out.remaining_futures, 0);
        assert_eq!(out.reading.band, UqiBand::Narrowing);
        assert!(out.reading.value < 0.66);
    }
}
