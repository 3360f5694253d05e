//! Index readings

use super::bands::{Band, CtiBand, EtiBand, MtiBand};
use super::labels::labelled_enum;
use super::regime::Regime;
use serde::{Deserialize, Serialize};

/// A pressure index with its band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexReading<B> {
    /// Value on the index's raw scale
    pub raw: f64,
    /// Value on [0,1]
    pub normalized: f64,
    pub band: B,
}

/// The three pressure indices for one snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureIndices {
    pub cti: IndexReading<CtiBand>,
    pub mti: IndexReading<MtiBand>,
    pub eti: IndexReading<EtiBand>,
}

/// A fused index (IRQ, REI, UQI): the fused pressure, the gravity it was
/// compared against, the resulting value and band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusedReading<B> {
    /// Index value on [0,1]
    pub value: f64,
    pub band: B,
    /// Fused pressure before the value transform
    pub pressure: f64,
    /// Regime- and custody-adjusted threshold
    pub gravity: f64,
}

impl<B: Band> FusedReading<B> {
    /// Whether the band is restricted to pressure regimes
    pub fn is_gated(&self) -> bool {
        self.band.is_gated()
    }
}

labelled_enum! {
    /// Which fused index a diagnostic refers to
    pub enum FusedIndex {
        Irq => "IRQ",
        Rei => "REI",
        Uqi => "UQI",
    }
}

/// A gated band was requested outside the pressure regimes and clamped.
///
/// Non-fatal: the snapshot carries the clamped band and this record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatingViolation {
    pub index: FusedIndex,
    pub regime: Regime,
    /// Band label that was requested
    pub attempted: String,
    /// Band label that was kept
    pub clamped_to: String,
}

impl std::fmt::Display for GatingViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} band {} not permitted in {}; clamped to {}",
            self.index, self.attempted, self.regime, self.clamped_to
        )
    }
}
