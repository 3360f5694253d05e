//! State Vector Assembler
//!
//! Pure aggregation of the parts computed upstream. Every part is required;
//! the first missing one fails the date with `IncompleteSnapshot`. Fused
//! bands are re-checked against the regime gate on the way in, so a band
//! forced upstream can never reach the ledger outside a pressure regime.

use crate::error::{EngineError, Result};
use crate::fusion::{FusedGate, Ladder};
use chainwalk_core::{
    BlockHeight, CustodyVector, Date, EntropyState, FusedIndex, FusedReading, GatingViolation,
    HashrateState, IntentClock, IrqBand, MinerCohort, PressureIndices, PriceCorridor, Regime,
    RegimeClock, ReiBand, StateVector, UqiBand,
};
use log::warn;

/// Builder for one date's [`StateVector`]
#[derive(Debug, Clone)]
pub struct SnapshotAssembler {
    date: Date,
    block_height: BlockHeight,
    regime: Option<Regime>,
    regime_clock: Option<RegimeClock>,
    intent_clock: Option<IntentClock>,
    pressure: Option<PressureIndices>,
    irq: Option<(FusedReading<IrqBand>, Ladder)>,
    rei: Option<(FusedReading<ReiBand>, Ladder)>,
    uqi: Option<(FusedReading<UqiBand>, Ladder, u32)>,
    custody: Option<CustodyVector>,
    entropy: Option<EntropyState>,
    corridor: Option<PriceCorridor>,
    hashrate: Option<HashrateState>,
    cohort: Option<MinerCohort>,
    incentive_delta: Option<f64>,
    feature_fingerprint: Option<String>,
    config_fingerprint: Option<String>,
}

impl SnapshotAssembler {
    pub fn new(date: Date, block_height: BlockHeight) -> Self {
        Self {
            date,
            block_height,
            regime: None,
            regime_clock: None,
            intent_clock: None,
            pressure: None,
            irq: None,
            rei: None,
            uqi: None,
            custody: None,
            entropy: None,
            corridor: None,
            hashrate: None,
            cohort: None,
            incentive_delta: None,
            feature_fingerprint: None,
            config_fingerprint: None,
        }
    }

    pub fn with_regime(mut self, regime: Regime) -> Self {
        self.regime = Some(regime);
        self
    }

    pub fn with_clocks(mut self, regime_clock: RegimeClock, intent_clock: IntentClock) -> Self {
        self.regime_clock = Some(regime_clock);
        self.intent_clock = Some(intent_clock);
        self
    }

    pub fn with_pressure(mut self, pressure: PressureIndices) -> Self {
        self.pressure = Some(pressure);
        self
    }

    /// IRQ reading and the ladder it was settled on
    pub fn with_irq(mut self, reading: FusedReading<IrqBand>, ladder: Ladder) -> Self {
        self.irq = Some((reading, ladder));
        self
    }

    pub fn with_rei(mut self, reading: FusedReading<ReiBand>, ladder: Ladder) -> Self {
        self.rei = Some((reading, ladder));
        self
    }

    pub fn with_uqi(
        mut self,
        reading: FusedReading<UqiBand>,
        ladder: Ladder,
        remaining_futures: u32,
    ) -> Self {
        self.uqi = Some((reading, ladder, remaining_futures));
        self
    }

    pub fn with_custody(mut self, custody: CustodyVector) -> Self {
        self.custody = Some(custody);
        self
    }

    pub fn with_context(
        mut self,
        entropy: EntropyState,
        corridor: PriceCorridor,
        hashrate: HashrateState,
        cohort: MinerCohort,
    ) -> Self {
        self.entropy = Some(entropy);
        self.corridor = Some(corridor);
        self.hashrate = Some(hashrate);
        self.cohort = Some(cohort);
        self
    }

    pub fn with_incentive_delta(mut self, delta: f64) -> Self {
        self.incentive_delta = Some(delta);
        self
    }

    pub fn with_fingerprints(
        mut self,
        feature_fingerprint: impl Into<String>,
        config_fingerprint: impl Into<String>,
    ) -> Self {
        self.feature_fingerprint = Some(feature_fingerprint.into());
        self.config_fingerprint = Some(config_fingerprint.into());
        self
    }

    pub fn assemble(self) -> Result<StateVector> {
        let date = self.date;
        let missing = |part: &'static str| EngineError::IncompleteSnapshot { date, part };

        let regime = self.regime.ok_or_else(|| missing("regime"))?;
        let regime_clock = self.regime_clock.ok_or_else(|| missing("regime_clock"))?;
        let intent_clock = self.intent_clock.ok_or_else(|| missing("intent_clock"))?;
        let pressure = self.pressure.ok_or_else(|| missing("pressure"))?;
        let (irq, irq_ladder) = self.irq.ok_or_else(|| missing("irq"))?;
        let (rei, rei_ladder) = self.rei.ok_or_else(|| missing("rei"))?;
        let (uqi, uqi_ladder, remaining_futures) = self.uqi.ok_or_else(|| missing("uqi"))?;
        let custody = self.custody.ok_or_else(|| missing("custody"))?;
        let entropy = self.entropy.ok_or_else(|| missing("entropy"))?;
        let corridor = self.corridor.ok_or_else(|| missing("corridor"))?;
        let hashrate = self.hashrate.ok_or_else(|| missing("hashrate"))?;
        let cohort = self.cohort.ok_or_else(|| missing("cohort"))?;
        let incentive_delta = self.incentive_delta.ok_or_else(|| missing("incentive_delta"))?;
        let feature_fingerprint = self
            .feature_fingerprint
            .ok_or_else(|| missing("feature_fingerprint"))?;
        let config_fingerprint = self
            .config_fingerprint
            .ok_or_else(|| missing("config_fingerprint"))?;

        let mut diagnostics: Vec<GatingViolation> = Vec::new();
        let (irq, v) = FusedGate::new(FusedIndex::Irq, irq_ladder).enforce(irq, regime);
        diagnostics.extend(v);
        let (rei, v) = FusedGate::new(FusedIndex::Rei, rei_ladder).enforce(rei, regime);
        diagnostics.extend(v);
        let (uqi, v) = FusedGate::new(FusedIndex::Uqi, uqi_ladder).enforce(uqi, regime);
        diagnostics.extend(v);

        if !diagnostics.is_empty() {
            warn!(
                "[ENGINE] {}: {} gating correction(s) applied during assembly",
                date,
                diagnostics.len()
            );
        }

        Ok(StateVector {
            date,
            block_height: self.block_height,
            regime,
            regime_clock,
            intent_clock,
            pressure,
            irq,
            rei,
            uqi,
            remaining_futures,
            custody,
            entropy,
            corridor,
            hashrate,
            cohort,
            incentive_delta,
            feature_fingerprint,
            config_fingerprint,
            diagnostics,
        })
    }
}
