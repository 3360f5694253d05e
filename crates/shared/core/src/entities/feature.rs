//! Feature sets
//!
//! A `FeatureSet` is what the (external) block and mempool extractors hand to
//! the engine for one date. `NormalizedFeatures` is the same data clamped into
//! canonical domains.
//!
//! No member of either type is, or is derived from, a market price. The
//! `Feature` key space is closed: a JSON feature set carrying any other key
//! (e.g. `price_usd`) fails to deserialize.

use super::labels::{labelled_enum, sanitize_label};
use crate::values::{BlockHeight, Date};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

labelled_enum! {
    /// Required numeric members of a feature set
    pub enum Feature {
        /// Chain tension, raw 0–10
        ChainTension => "chain_tension",
        /// Consecutive days of same-direction custody flow (integer ≥ 0)
        CustodyStreak => "custody_streak",
        /// Miner stress, raw 0–1
        MinerStress => "miner_stress",
        /// Difficulty-epoch tension, raw 0–1
        EpochTension => "epoch_tension",
        /// Relative change in mempool transaction count
        MempoolIntentDelta => "mempool_intent_delta",
        /// Deviation of block entropy from its trailing mean
        EntropyDeviation => "entropy_deviation",
    }
}

labelled_enum! {
    /// Direction of coins moving between custody and markets
    pub enum CustodyDirection {
        /// Coins moving toward exchanges
        Marketward => "marketward",
        /// Coins moving into long-term custody
        Chainward => "chainward",
        Neutral => "neutral",
    }
}

impl CustodyDirection {
    /// +1 marketward, −1 chainward, 0 neutral
    pub fn sign(&self) -> f64 {
        match self {
            CustodyDirection::Marketward => 1.0,
            CustodyDirection::Chainward => -1.0,
            CustodyDirection::Neutral => 0.0,
        }
    }

    /// Whether custody is flowing in either direction
    pub fn is_directed(&self) -> bool {
        !matches!(self, CustodyDirection::Neutral)
    }
}

impl Default for CustodyDirection {
    fn default() -> Self {
        CustodyDirection::Neutral
    }
}

labelled_enum! {
    /// Hashrate direction versus its 7-day baseline
    pub enum HashrateTrend {
        Falling => "falling",
        Flat => "flat",
        Rising => "rising",
        /// No data supplied
        NoData => "nd",
    }
}

impl Default for HashrateTrend {
    fn default() -> Self {
        HashrateTrend::NoData
    }
}

/// Non-numeric context carried through to the snapshot unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureContext {
    /// Hashrate trend label from the extractor
    #[serde(default)]
    pub hashrate_trend: HashrateTrend,
    /// Miner cohort tilt label
    #[serde(default)]
    pub cohort_tilt: Option<String>,
    /// Dominant mining pool over the window
    #[serde(default)]
    pub dominant_pool: Option<String>,
}

impl FeatureContext {
    /// Cohort tilt as a line-safe token (`none` when absent)
    pub fn cohort_token(&self) -> String {
        self.cohort_tilt
            .as_deref()
            .map(sanitize_label)
            .unwrap_or_else(|| "none".to_string())
    }

    /// Dominant pool as a line-safe token (`na` when absent)
    pub fn pool_token(&self) -> String {
        self.dominant_pool
            .as_deref()
            .map(sanitize_label)
            .unwrap_or_else(|| "na".to_string())
    }
}

/// Raw feature set for one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureSet {
    pub date: Date,
    pub block_height: BlockHeight,
    /// Raw numeric features
    #[serde(default)]
    pub values: BTreeMap<Feature, f64>,
    /// Custody flow direction (required)
    #[serde(default)]
    pub custody_direction: Option<CustodyDirection>,
    #[serde(default)]
    pub context: FeatureContext,
}

impl FeatureSet {
    /// Create an empty feature set
    pub fn new(date: Date, block_height: BlockHeight) -> Self {
        Self {
            date,
            block_height,
            values: BTreeMap::new(),
            custody_direction: None,
            context: FeatureContext::default(),
        }
    }

    /// Builder: set a numeric feature
    pub fn with(mut self, feature: Feature, value: f64) -> Self {
        self.values.insert(feature, value);
        self
    }

    /// Builder: set custody direction
    pub fn with_custody(mut self, direction: CustodyDirection) -> Self {
        self.custody_direction = Some(direction);
        self
    }

    /// Builder: set context labels
    pub fn with_context(mut self, context: FeatureContext) -> Self {
        self.context = context;
        self
    }

    /// Raw value of a feature, if present
    pub fn get(&self, feature: Feature) -> Option<f64> {
        self.values.get(&feature).copied()
    }

    /// Required numeric features that are absent
    pub fn missing(&self) -> Vec<Feature> {
        Feature::ALL
            .iter()
            .copied()
            .filter(|f| !self.values.contains_key(f))
            .collect()
    }
}

/// Feature set clamped into canonical domains.
///
/// `cti`, `mti`, `eti` and `custody_norm` lie in [0,1]; `cti_raw` in [0,10];
/// the two signed deltas in [-1,1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFeatures {
    pub date: Date,
    pub block_height: BlockHeight,
    /// Chain tension on its raw 0–10 scale
    pub cti_raw: f64,
    /// CTI* = raw / 10
    pub cti: f64,
    /// MTI* (miner stress)
    pub mti: f64,
    /// ETI* (epoch tension)
    pub eti: f64,
    pub custody_streak: u32,
    /// min(streak / 10, 1)
    pub custody_norm: f64,
    pub custody_direction: CustodyDirection,
    pub mempool_intent_delta: f64,
    pub entropy_deviation: f64,
    pub context: FeatureContext,
}

impl NormalizedFeatures {
    /// The values that must lie in [0,1]
    pub fn unit_values(&self) -> [f64; 4] {
        [self.cti, self.mti, self.eti, self.custody_norm]
    }
}
