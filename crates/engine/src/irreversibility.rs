//! Irreversibility Engine (IRQ)
//!
//! # Algorithm
//!
//! 1. Effective tension: `T_eff = w_R · CTI*`
//! 2. Fused pressure: `P = T_eff · MTI*`, so danger needs tension AND stress
//! 3. Custody gravity: `g = g_base(R) + β_R · sign(dir) · ln(1 + k)`, clamped
//!    to `[gravity_floor, 1]`
//! 4. Bands against `g`: reversible below `0.45·g`, primed below `g`,
//!    irreversible at or above `g` (pressure regime and CTI* at the high
//!    tension floor), protocol-floor at `g + δ` with strict MTI*/CTI* floors
//! 5. Value: piecewise-linear through `(0.45·g, 0.45)`, `(g, 0.78)`,
//!    `(g + δ, 0.90)`, kept inside the assigned band's value range
//!
//! ETI does not enter the IRQ value.

use crate::config::IrqConfig;
use crate::fusion::{FusedGate, Ladder};
use chainwalk_core::{
    Band, CustodyDirection, FusedIndex, FusedReading, GatingViolation, IrqBand, Regime,
};
use log::debug;

/// Inputs the IRQ reads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrqInputs {
    pub regime: Regime,
    /// CTI* on [0,1]
    pub cti: f64,
    /// MTI* on [0,1]
    pub mti: f64,
    pub custody_direction: CustodyDirection,
    pub custody_streak: u32,
}

#[derive(Debug, Clone, Default)]
pub struct IrreversibilityEngine {
    config: IrqConfig,
}

impl IrreversibilityEngine {
    pub fn new(config: IrqConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IrqConfig {
        &self.config
    }

    /// `T_eff = w_R · CTI*`
    pub fn effective_tension(&self, regime: Regime, cti: f64) -> f64 {
        self.config.weights.get(regime) * cti.clamp(0.0, 1.0)
    }

    /// `P = T_eff · MTI*`
    pub fn fused_pressure(&self, inputs: &IrqInputs) -> f64 {
        (self.effective_tension(inputs.regime, inputs.cti) * inputs.mti.clamp(0.0, 1.0))
            .clamp(0.0, 1.0)
    }

    /// Regime base gravity tilted by the custody streak
    pub fn gravity(&self, regime: Regime, direction: CustodyDirection, streak: u32) -> f64 {
        let base = self.config.gravity_base.get(regime);
        let beta = self.config.custody_beta.get(regime);
        let tilt = beta * direction.sign() * (1.0 + streak as f64).ln();
        (base + tilt).clamp(self.config.gravity_floor, 1.0)
    }

    /// Threshold ladder for a gravity
    pub fn ladder(&self, gravity: f64) -> Ladder {
        Ladder {
            thresholds: [
                self.config.primed_ratio * gravity,
                gravity,
                gravity + self.config.floor_margin,
            ],
            values: self.config.value_knots,
        }
    }

    pub fn gate(&self, gravity: f64) -> FusedGate {
        FusedGate::new(FusedIndex::Irq, self.ladder(gravity))
    }

    pub fn compute(&self, inputs: &IrqInputs) -> FusedReading<IrqBand> {
        let pressure = self.fused_pressure(inputs);
        let gravity = self.gravity(
            inputs.regime,
            inputs.custody_direction,
            inputs.custody_streak,
        );

        let irreversible_ok =
            inputs.regime.is_pressure() && inputs.cti >= self.config.high_tension_floor;
        let floor_ok = irreversible_ok
            && inputs.mti >= self.config.floor_mti
            && inputs.cti >= self.config.floor_cti;
        let max_level = if floor_ok {
            IrqBand::ProtocolFloor.level()
        } else if irreversible_ok {
            IrqBand::Irreversible.level()
        } else {
            IrqBand::Primed.level()
        };

        let reading = self
            .gate(gravity)
            .settle(pressure, gravity, max_level, inputs.regime);
        debug!(
            "[IRQ] {} P={:.3} g={:.3} -> {} {:.2}",
            inputs.regime, pressure, gravity, reading.band, reading.value
        );
        reading
    }

    /// Force a band onto the computed pressure.
    ///
    /// The forced band is re-checked against the regime gate; a gated band
    /// outside a pressure regime comes back clamped with a diagnostic.
    pub fn force_band(
        &self,
        inputs: &IrqInputs,
        band: IrqBand,
    ) -> (FusedReading<IrqBand>, Option<GatingViolation>) {
        let pressure = self.fused_pressure(inputs);
        let gravity = self.gravity(
            inputs.regime,
            inputs.custody_direction,
            inputs.custody_streak,
        );
        let gate = self.gate(gravity);
        gate.enforce(gate.forced(pressure, gravity, band), inputs.regime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn inputs(regime: Regime, cti: f64, mti: f64) -> IrqInputs {
        IrqInputs {
            regime,
            cti,
            mti,
            custody_direction: CustodyDirection::Marketward,
            custody_streak: 12,
        }
    }

    #[test]
    fn test_compression_scenario_is_irreversible() {
        let engine = IrreversibilityEngine::default();
        let i = inputs(Regime::Compression, 0.86, 0.82);

        assert_relative_eq!(engine.effective_tension(i.regime, i.cti), 0.86);
        assert_relative_eq!(engine.fused_pressure(&i), 0.7052, epsilon = 1e-9);
        let g = engine.gravity(i.regime, i.custody_direction, i.custody_streak);
        assert_relative_eq!(g, 0.30 + 0.08 * 13f64.ln(), epsilon = 1e-12);
        assert!((g - 0.505).abs() < 1e-3);

        let reading = engine.compute(&i);
        // P ≥ g + δ, but MTI* 0.82 misses the strict floor
        assert_eq!(reading.band, IrqBand::Irreversible);
        assert!(reading.value >= 0.78 && reading.value < 0.90);
        assert_relative_eq!(reading.gravity, g);
    }

    #[test]
    fn test_distribution_scenario_capped_at_primed() {
        let engine = IrreversibilityEngine::default();
        let reading = engine.compute(&inputs(Regime::Distribution, 0.86, 0.82));
        assert_eq!(reading.band, IrqBand::Primed);
        assert!(reading.value < 0.78);

        let extreme = engine.compute(&inputs(Regime::Distribution, 1.0, 1.0));
        assert_eq!(extreme.band, IrqBand::Primed);
    }

    #[test]
    fn test_protocol_floor_needs_strict_floors() {
        let engine = IrreversibilityEngine::default();
        let reading = engine.compute(&inputs(Regime::Compression, 0.95, 0.92));
        assert_eq!(reading.band, IrqBand::ProtocolFloor);
        assert!(reading.value >= 0.90);
    }

    #[test]
    fn test_low_tension_stays_primed_in_pressure_regime() {
        let engine = IrreversibilityEngine::default();
        let i = IrqInputs {
            regime: Regime::Compression,
            cti: 0.62,
            mti: 1.0,
            custody_direction: CustodyDirection::Chainward,
            custody_streak: 20,
        };
        // P = 0.62 clears gravity but CTI* is under the high-tension floor
        assert!(engine.fused_pressure(&i) >= engine.gravity(i.regime, i.custody_direction, 20));
        assert_eq!(engine.compute(&i).band, IrqBand::Primed);
    }

    #[test]
    fn test_either_factor_near_zero_is_reversible() {
        let engine = IrreversibilityEngine::default();
        assert_eq!(
            engine.compute(&inputs(Regime::Compression, 1.0, 0.01)).band,
            IrqBand::Reversible
        );
        assert_eq!(
            engine.compute(&inputs(Regime::Compression, 0.01, 1.0)).band,
            IrqBand::Reversible
        );
    }

    #[test]
    fn test_gravity_tilt_and_floor() {
        let engine = IrreversibilityEngine::default();
        let neutral = engine.gravity(Regime::Ascent, CustodyDirection::Neutral, 50);
        assert_relative_eq!(neutral, 0.25);
        let chainward = engine.gravity(Regime::Ascent, CustodyDirection::Chainward, 5);
        assert!(chainward < neutral);
        let huge = engine.gravity(Regime::Ascent, CustodyDirection::Chainward, u32::MAX);
        assert_relative_eq!(huge, 0.05);
    }

    #[test]
    fn test_forced_gated_band_outside_pressure_is_healed() {
        let engine = IrreversibilityEngine::default();
        let (reading, violation) =
            engine.force_band(&inputs(Regime::Ascent, 0.86, 0.82), IrqBand::Irreversible);
        assert_eq!(reading.band, IrqBand::Primed);
        let violation = violation.unwrap();
        assert_eq!(violation.index, FusedIndex::Irq);
        assert_eq!(violation.regime, Regime::Ascent);

        let (kept, none) =
            engine.force_band(&inputs(Regime::Starvation, 0.86, 0.82), IrqBand::Irreversible);
        assert_eq!(kept.band, IrqBand::Irreversible);
        assert!(none.is_none());
    }
}
