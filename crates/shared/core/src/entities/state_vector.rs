//! State Vector (the "Spine")
//!
//! One immutable snapshot per date. Built once by the assembler, appended once
//! to the ledger, never mutated afterwards. Every field is plain data with a
//! fixed order so that serializing the same snapshot always yields the same
//! bytes.

use super::bands::{HashrateBand, IrqBand, ReiBand, UqiBand};
use super::clocks::{IntentClock, RegimeClock};
use super::context::{EntropyState, PriceCorridor};
use super::feature::{CustodyDirection, HashrateTrend};
use super::indices::{FusedReading, GatingViolation, PressureIndices};
use super::regime::Regime;
use crate::values::{BlockHeight, Date};
use serde::{Deserialize, Serialize};

/// Custody flow at snapshot time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CustodyVector {
    pub direction: CustodyDirection,
    pub streak: u32,
    /// min(streak / 10, 1)
    pub norm: f64,
}

/// Hashrate field: extractor trend plus the miner stress band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HashrateState {
    pub trend: HashrateTrend,
    pub band: HashrateBand,
    /// Miner stress on [0,1]
    pub stress: f64,
}

/// Miner cohort labels (line-safe tokens)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinerCohort {
    pub tilt: String,
    pub dominant_pool: String,
}

/// Canonical per-date snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateVector {
    pub date: Date,
    pub block_height: BlockHeight,
    pub regime: Regime,
    pub regime_clock: RegimeClock,
    pub intent_clock: IntentClock,
    pub pressure: PressureIndices,
    pub irq: FusedReading<IrqBand>,
    pub rei: FusedReading<ReiBand>,
    pub uqi: FusedReading<UqiBand>,
    /// Independent constraints still unbound
    pub remaining_futures: u32,
    pub custody: CustodyVector,
    pub entropy: EntropyState,
    pub corridor: PriceCorridor,
    pub hashrate: HashrateState,
    pub cohort: MinerCohort,
    /// Signed mempool intent delta
    pub incentive_delta: f64,
    /// SHA-256 (hex) of the canonical input feature set
    pub feature_fingerprint: String,
    /// SHA-256 (hex) of the configuration used
    pub config_fingerprint: String,
    /// Non-fatal gating corrections applied while building
    #[serde(default)]
    pub diagnostics: Vec<GatingViolation>,
}

impl StateVector {
    /// Fused pressure behind the IRQ
    pub fn fused_pressure(&self) -> f64 {
        self.irq.pressure
    }

    /// Last eight hex characters of the feature fingerprint
    pub fn short_fingerprint(&self) -> &str {
        let fp = self.feature_fingerprint.as_str();
        let start = fp.len().saturating_sub(8);
        fp.get(start..).unwrap_or(fp)
    }

    /// Whether any severe band is claimed outside a pressure regime
    pub fn violates_gating(&self) -> bool {
        !self.regime.is_pressure()
            && (self.irq.is_gated() || self.rei.is_gated() || self.uqi.is_gated())
    }
}
