//! Fusion engine
//!
//! Wires the stages together. A day is computed in two halves:
//!
//! - [`FusionEngine::prepare`]: everything that depends on the day's
//!   features alone (normalize, classify, pressure stack, context,
//!   fingerprint). Days can be prepared in any order, in parallel.
//! - [`FusionEngine::complete`]: everything that depends on the ledger's
//!   trailing history (clocks, then IRQ, REI and UQI), then assembly.
//!   Days must be completed in date order.

use crate::assembler::SnapshotAssembler;
use crate::classifier::{RegimeClassifier, ThresholdClassifier};
use crate::clocks::{ClockEngine, DayMark};
use crate::config::EngineConfig;
use crate::context::ContextEngine;
use crate::distribution::RegimeOutlook;
use crate::error::Result;
use crate::fingerprint::feature_fingerprint;
use crate::irreversibility::{IrqInputs, IrreversibilityEngine};
use crate::normalizer::normalize;
use crate::pressure::PressureStack;
use crate::resolution::{ReiInputs, ResolutionEngine};
use crate::uncertainty::{UncertaintyEngine, UqiInputs};
use chainwalk_core::{
    CustodyVector, Date, EntropyState, FeatureSet, HashrateState, IntentState, MinerCohort,
    NormalizedFeatures, PressureIndices, PriceCorridor, Regime, StateVector,
};
use log::{debug, info};

/// History-free half of a day's computation
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedDay {
    pub features: NormalizedFeatures,
    pub regime: Regime,
    pub pressure: PressureIndices,
    pub intent: IntentState,
    pub entropy: EntropyState,
    pub corridor: PriceCorridor,
    pub hashrate: HashrateState,
    pub cohort: MinerCohort,
    pub feature_fingerprint: String,
}

impl PreparedDay {
    pub fn date(&self) -> Date {
        self.features.date
    }
}

pub struct FusionEngine {
    config: EngineConfig,
    config_fingerprint: String,
    classifier: Box<dyn RegimeClassifier>,
    pressure: PressureStack,
    irq: IrreversibilityEngine,
    rei: ResolutionEngine,
    uqi: UncertaintyEngine,
    clocks: ClockEngine,
    context: ContextEngine,
    outlook: RegimeOutlook,
}

impl FusionEngine {
    /// Validate the configuration and build every stage from it
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let config_fingerprint = config.fingerprint()?;
        info!(
            "[ENGINE] Config v{} fingerprint {}",
            config.version, config_fingerprint
        );

        Ok(Self {
            classifier: Box::new(ThresholdClassifier::new(config.classifier.clone())),
            pressure: PressureStack::new(config.pressure.clone()),
            irq: IrreversibilityEngine::new(config.irq.clone()),
            rei: ResolutionEngine::new(config.rei.clone(), config.irq.weights),
            uqi: UncertaintyEngine::new(config.uqi.clone(), config.irq.weights),
            clocks: ClockEngine::new(config.clocks.clone()),
            context: ContextEngine::new(config.context.clone()),
            outlook: RegimeOutlook::new(config.distribution.clone()),
            config_fingerprint,
            config,
        })
    }

    /// Builder: replace the regime classifier
    pub fn with_classifier(mut self, classifier: Box<dyn RegimeClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn config_fingerprint(&self) -> &str {
        &self.config_fingerprint
    }

    pub fn outlook(&self) -> &RegimeOutlook {
        &self.outlook
    }

    pub fn prepare(&self, raw: &FeatureSet) -> Result<PreparedDay> {
        let features = normalize(raw)?;
        let regime = self.classifier.classify(&features);
        let pressure = self.pressure.compute(&features, regime);
        let entropy = self.context.entropy_state(features.entropy_deviation);
        let corridor =
            self.context
                .corridor(features.custody_direction, entropy, features.cti_raw);
        let hashrate = HashrateState {
            trend: features.context.hashrate_trend,
            band: self.context.hashrate_band(features.mti),
            stress: features.mti,
        };
        let cohort = MinerCohort {
            tilt: features.context.cohort_token(),
            dominant_pool: features.context.pool_token(),
        };

        debug!(
            "[ENGINE] {} prepared via {}: {} CTI={} MTI={} ETI={}",
            features.date,
            self.classifier.name(),
            regime,
            pressure.cti.band,
            pressure.mti.band,
            pressure.eti.band
        );

        Ok(PreparedDay {
            intent: self.clocks.intent_state(features.mempool_intent_delta),
            feature_fingerprint: feature_fingerprint(raw)?,
            features,
            regime,
            pressure,
            entropy,
            corridor,
            hashrate,
            cohort,
        })
    }

    /// Finish a prepared day against the ledger's trailing history
    /// (ascending by date, entries for the day itself ignored)
    pub fn complete(&self, day: PreparedDay, history: &[DayMark]) -> Result<StateVector> {
        let date = day.date();
        let f = &day.features;

        let regime_clock = self.clocks.regime_clock(day.regime, date, history);
        let intent_clock = self.clocks.intent_clock(day.intent, date, history);

        let irq = self.irq.compute(&IrqInputs {
            regime: day.regime,
            cti: f.cti,
            mti: f.mti,
            custody_direction: f.custody_direction,
            custody_streak: f.custody_streak,
        });
        let rei = self.rei.compute(&ReiInputs {
            regime: day.regime,
            cti: f.cti,
            regime_clock,
            intent_clock,
            irq_band: irq.band,
        });
        let uqi = self.uqi.compute(&UqiInputs {
            regime: day.regime,
            pressure: &day.pressure,
            custody_streak: f.custody_streak,
            custody_directed: f.custody_direction.is_directed(),
            irq_band: irq.band,
            intent_clock,
        });

        let state = SnapshotAssembler::new(date, f.block_height)
            .with_regime(day.regime)
            .with_clocks(regime_clock, intent_clock)
            .with_pressure(day.pressure)
            .with_irq(irq, self.irq.ladder(irq.gravity))
            .with_rei(rei, self.rei.gate().ladder)
            .with_uqi(uqi.reading, self.uqi.gate().ladder, uqi.remaining_futures)
            .with_custody(CustodyVector {
                direction: f.custody_direction,
                streak: f.custody_streak,
                norm: f.custody_norm,
            })
            .with_context(day.entropy, day.corridor, day.hashrate, day.cohort.clone())
            .with_incentive_delta(f.mempool_intent_delta)
            .with_fingerprints(day.feature_fingerprint.clone(), self.config_fingerprint.clone())
            .assemble()?;

        info!(
            "[ENGINE] {} {} ({}) IRQ={} {:.2} REI={} UQI={}",
            date,
            state.regime,
            state.regime_clock.phase,
            state.irq.band,
            state.irq.value,
            state.rei.band,
            state.uqi.band
        );
        Ok(state)
    }

    /// Prepare and complete in one call
    pub fn snapshot(&self, raw: &FeatureSet, history: &[DayMark]) -> Result<StateVector> {
        self.complete(self.prepare(raw)?, history)
    }
}

/// What the clocks remember about a stored snapshot
pub fn day_mark(state: &StateVector) -> DayMark {
    DayMark {
        date: state.date,
        regime: state.regime,
        intent: state.intent_clock.state,
    }
}
