//! Pressure Stack
//!
//! Computes CTI, MTI and ETI with their bands. Each index is computed on its
//! own input, but every band reads the shared regime, and no band is assigned
//! on a single metric in isolation where a second condition is required.

use crate::config::PressureConfig;
use chainwalk_core::{
    CtiBand, EtiBand, IndexReading, MtiBand, NormalizedFeatures, PressureIndices, Regime,
};

#[derive(Debug, Clone, Default)]
pub struct PressureStack {
    config: PressureConfig,
}

impl PressureStack {
    pub fn new(config: PressureConfig) -> Self {
        Self { config }
    }

    pub fn compute(&self, features: &NormalizedFeatures, regime: Regime) -> PressureIndices {
        PressureIndices {
            cti: IndexReading {
                raw: features.cti_raw,
                normalized: features.cti,
                band: self.cti_band(features.cti_raw, regime),
            },
            mti: IndexReading {
                raw: features.mti,
                normalized: features.mti,
                band: self.mti_band(features.mti, features.cti_raw, regime),
            },
            eti: IndexReading {
                raw: features.eti,
                normalized: features.eti,
                band: self.eti_band(features.eti, regime),
            },
        }
    }

    /// `break` only exists under pressure; elsewhere the ladder tops out at `coil`
    pub fn cti_band(&self, cti_raw: f64, regime: Regime) -> CtiBand {
        let c = &self.config;
        if cti_raw >= c.cti_break && regime.is_pressure() {
            CtiBand::Break
        } else if cti_raw >= c.cti_coil {
            CtiBand::Coil
        } else if cti_raw >= c.cti_directional {
            CtiBand::Directional
        } else {
            CtiBand::Relaxed
        }
    }

    pub fn mti_band(&self, stress: f64, cti_raw: f64, regime: Regime) -> MtiBand {
        let c = &self.config;
        if regime.is_pressure() && stress >= c.mti_forced_stress && cti_raw >= c.mti_forced_cti {
            MtiBand::Forced
        } else if stress >= c.mti_strained_stress && cti_raw >= c.mti_strained_cti {
            MtiBand::Strained
        } else {
            MtiBand::Normal
        }
    }

    pub fn eti_band(&self, eti: f64, regime: Regime) -> EtiBand {
        let c = &self.config;
        let overclocked = if regime.is_pressure() {
            c.eti_overclocked_pressure
        } else {
            c.eti_overclocked_other
        };
        if eti >= overclocked {
            EtiBand::Overclocked
        } else if eti >= c.eti_balanced {
            EtiBand::Balanced
        } else {
            EtiBand::Relaxed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cti_bands() {
        let stack = PressureStack::default();
        assert_eq!(stack.cti_band(2.9, Regime::Compression), CtiBand::Relaxed);
        assert_eq!(stack.cti_band(3.0, Regime::Compression), CtiBand::Directional);
        assert_eq!(stack.cti_band(5.0, Regime::Ascent), CtiBand::Coil);
        assert_eq!(stack.cti_band(8.6, Regime::Starvation), CtiBand::Break);
        assert_eq!(stack.cti_band(8.6, Regime::Distribution), CtiBand::Coil);
    }

    #[test]
    fn test_mti_needs_tension_as_well_as_stress() {
        let stack = PressureStack::default();
        assert_eq!(stack.mti_band(0.82, 8.6, Regime::Compression), MtiBand::Forced);
        // Same stress, low tension: never forced, not even strained
        assert_eq!(stack.mti_band(0.82, 2.0, Regime::Compression), MtiBand::Normal);
        // Outside a pressure regime stress tops out at strained
        assert_eq!(stack.mti_band(0.82, 8.6, Regime::Ascent), MtiBand::Strained);
        assert_eq!(stack.mti_band(0.45, 5.0, Regime::Distribution), MtiBand::Strained);
        assert_eq!(stack.mti_band(0.39, 9.0, Regime::Compression), MtiBand::Normal);
    }

    #[test]
    fn test_eti_floor_depends_on_regime() {
        let stack = PressureStack::default();
        assert_eq!(stack.eti_band(0.2, Regime::Compression), EtiBand::Relaxed);
        assert_eq!(stack.eti_band(0.75, Regime::Starvation), EtiBand::Overclocked);
        assert_eq!(stack.eti_band(0.75, Regime::Ascent), EtiBand::Balanced);
        assert_eq!(stack.eti_band(0.90, Regime::Ascent), EtiBand::Overclocked);
    }

    #[test]
    fn test_bands_monotone_in_own_input() {
        let stack = PressureStack::default();
        for regime in Regime::ALL {
            let mut last = (CtiBand::Relaxed, MtiBand::Normal, EtiBand::Relaxed);
            for step in 0..=100 {
                let x = step as f64 / 100.0;
                let bands = (
                    stack.cti_band(x * 10.0, *regime),
                    stack.mti_band(x, 7.0, *regime),
                    stack.eti_band(x, *regime),
                );
                assert!(bands.0 >= last.0 && bands.1 >= last.1 && bands.2 >= last.2);
                last = bands;
            }
        }
    }
}
