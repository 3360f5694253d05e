//! Engine configuration
//!
//! Every threshold, weight and breakpoint the engine uses lives here, in one
//! versioned structure. The structure is fingerprinted (SHA-256 over its
//! canonical JSON plus the formula version) so a deployment can pin a
//! known-good value and refuse to start when the running constants drift.
//!
//! Supports JSON configuration files; every section falls back to its
//! defaults when omitted.

use crate::error::ConfigError;
use crate::fusion::BAND_CEILING_GAP;
use chainwalk_core::Regime;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Version of the fusion formulae. Bumped whenever the math changes shape,
/// independently of the tunable constants.
pub const FORMULA_VERSION: &str = "cw-fusion-1";

/// One value per regime
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeTable<T> {
    pub compression: T,
    pub ascent: T,
    pub starvation: T,
    pub distribution: T,
}

impl<T: Copy> RegimeTable<T> {
    pub fn uniform(value: T) -> Self {
        Self {
            compression: value,
            ascent: value,
            starvation: value,
            distribution: value,
        }
    }

    pub fn get(&self, regime: Regime) -> T {
        match regime {
            Regime::Compression => self.compression,
            Regime::Ascent => self.ascent,
            Regime::Starvation => self.starvation,
            Regime::Distribution => self.distribution,
        }
    }
}

/// Regime classifier breakpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// CTI* at or above which tension is stored (COMPRESSION / STARVATION)
    pub compression_floor: f64,
    /// CTI* below which low tension holds (ASCENT / DISTRIBUTION)
    pub distribution_ceiling: f64,
    /// Streak a custody direction needs before it counts as directed
    pub min_custody_streak: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            compression_floor: 0.60,
            distribution_ceiling: 0.30,
            min_custody_streak: 1,
        }
    }
}

/// Pressure stack band thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PressureConfig {
    /// Raw CTI (0–10) where `directional` starts
    pub cti_directional: f64,
    /// Raw CTI where `coil` starts
    pub cti_coil: f64,
    /// Raw CTI where `break` starts (pressure regimes only)
    pub cti_break: f64,
    pub mti_strained_stress: f64,
    /// Raw CTI that must accompany `strained`
    pub mti_strained_cti: f64,
    pub mti_forced_stress: f64,
    /// Raw CTI that must accompany `forced`
    pub mti_forced_cti: f64,
    pub eti_balanced: f64,
    /// `overclocked` floor inside pressure regimes
    pub eti_overclocked_pressure: f64,
    /// `overclocked` floor elsewhere
    pub eti_overclocked_other: f64,
}

impl Default for PressureConfig {
    fn default() -> Self {
        Self {
            cti_directional: 3.0,
            cti_coil: 5.0,
            cti_break: 7.5,
            mti_strained_stress: 0.40,
            mti_strained_cti: 4.5,
            mti_forced_stress: 0.70,
            mti_forced_cti: 6.5,
            eti_balanced: 0.30,
            eti_overclocked_pressure: 0.70,
            eti_overclocked_other: 0.85,
        }
    }
}

/// Irreversibility fusion constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IrqConfig {
    /// Regime weight w_R scaling CTI*
    pub weights: RegimeTable<f64>,
    /// Base custody gravity g_base(R)
    pub gravity_base: RegimeTable<f64>,
    /// Streak tilt β_R
    pub custody_beta: RegimeTable<f64>,
    /// Lower clamp on gravity
    pub gravity_floor: f64,
    /// `primed` starts at this fraction of gravity
    pub primed_ratio: f64,
    /// δ: margin above gravity for `protocol-floor`
    pub floor_margin: f64,
    /// CTI* needed for `irreversible`
    pub high_tension_floor: f64,
    /// MTI* needed for `protocol-floor`
    pub floor_mti: f64,
    /// CTI* needed for `protocol-floor`
    pub floor_cti: f64,
    /// IRQ values at the primed, irreversible and protocol-floor thresholds
    pub value_knots: [f64; 3],
}

impl Default for IrqConfig {
    fn default() -> Self {
        Self {
            weights: RegimeTable {
                compression: 1.00,
                ascent: 0.80,
                starvation: 0.95,
                distribution: 0.70,
            },
            gravity_base: RegimeTable {
                compression: 0.30,
                ascent: 0.25,
                starvation: 0.28,
                distribution: 0.25,
            },
            custody_beta: RegimeTable::uniform(0.08),
            gravity_floor: 0.05,
            primed_ratio: 0.45,
            floor_margin: 0.15,
            high_tension_floor: 0.65,
            floor_mti: 0.85,
            floor_cti: 0.80,
            value_knots: [0.45, 0.78, 0.90],
        }
    }
}

/// Resolution-proximity ladder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReiConfig {
    /// Fused proximity thresholds for charged, imminent and triggered
    pub thresholds: [f64; 3],
}

impl Default for ReiConfig {
    fn default() -> Self {
        Self {
            thresholds: [0.30, 0.55, 0.78],
        }
    }
}

/// Remaining-futures ladder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UqiConfig {
    /// Fused binding-ratio thresholds for narrowing, thin and terminal
    pub thresholds: [f64; 3],
    /// Custody streak at which a directed flow counts as a bound constraint
    pub custody_streak_bound: u32,
}

impl Default for UqiConfig {
    fn default() -> Self {
        Self {
            thresholds: [0.33, 0.66, 0.88],
            custody_streak_bound: 7,
        }
    }
}

/// Intent and regime clocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Mempool delta at or above which intent is SURGING (mirrored for PURGE)
    pub intent_surge: f64,
    /// Mempool delta at or above which intent is ELEVATING (mirrored for BLEEDING)
    pub intent_drift: f64,
    pub intent_half_life_days: u32,
    /// Shortest historical regime length
    pub regime_min_days: u32,
    /// Longest historical regime length
    pub regime_max_days: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            intent_surge: 0.15,
            intent_drift: 0.02,
            intent_half_life_days: 15,
            regime_min_days: 40,
            regime_max_days: 70,
        }
    }
}

/// Entropy, corridor and hashrate context thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Entropy deviation dead band
    pub entropy_band: f64,
    /// Raw CTI at which a chainward, entropy-falling corridor closes
    pub corridor_forbidden_cti: f64,
    pub hashrate_strained: f64,
    pub hashrate_distress: f64,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            entropy_band: 0.05,
            corridor_forbidden_cti: 6.0,
            hashrate_strained: 0.3,
            hashrate_distress: 0.6,
        }
    }
}

/// Regime distribution and transition outlook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionConfig {
    /// Softmax temperature over regime affinities
    pub temperature: f64,
    /// Laplace pseudo-count per transition cell
    pub smoothing: f64,
    /// Lead below which the outlook is a coil rather than biased
    pub coil_spread: f64,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            temperature: 0.25,
            smoothing: 1.0,
            coil_spread: 0.08,
        }
    }
}

/// Root engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Constant-set version (independent of [`FORMULA_VERSION`])
    pub version: String,
    pub classifier: ClassifierConfig,
    pub pressure: PressureConfig,
    pub irq: IrqConfig,
    pub rei: ReiConfig,
    pub uqi: UqiConfig,
    pub clocks: ClockConfig,
    pub context: ContextConfig,
    pub distribution: DistributionConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: "0.1".to_string(),
            classifier: ClassifierConfig::default(),
            pressure: PressureConfig::default(),
            irq: IrqConfig::default(),
            rei: ReiConfig::default(),
            uqi: UqiConfig::default(),
            clocks: ClockConfig::default(),
            context: ContextConfig::default(),
            distribution: DistributionConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check orderings and ranges the fusion math depends on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.classifier;
        if !(0.0 < c.distribution_ceiling
            && c.distribution_ceiling < c.compression_floor
            && c.compression_floor <= 1.0)
        {
            return Err(invalid(format!(
                "classifier breakpoints must satisfy 0 < distribution_ceiling ({}) < compression_floor ({}) <= 1",
                c.distribution_ceiling, c.compression_floor
            )));
        }

        let p = &self.pressure;
        if !(0.0 < p.cti_directional && p.cti_directional < p.cti_coil && p.cti_coil < p.cti_break)
        {
            return Err(invalid("CTI band thresholds must be strictly increasing"));
        }
        if p.mti_strained_stress >= p.mti_forced_stress || p.mti_strained_cti > p.mti_forced_cti {
            return Err(invalid("MTI strained thresholds must sit below forced thresholds"));
        }
        if !(p.eti_balanced < p.eti_overclocked_pressure
            && p.eti_overclocked_pressure <= p.eti_overclocked_other)
        {
            return Err(invalid("ETI thresholds out of order"));
        }

        let irq = &self.irq;
        let w = &irq.weights;
        if !(w.compression >= w.starvation
            && w.starvation >= w.ascent
            && w.ascent >= w.distribution
            && w.distribution > 0.0
            && w.compression <= 1.0)
        {
            return Err(invalid(
                "regime weights must satisfy 1 >= COMPRESSION >= STARVATION >= ASCENT >= DISTRIBUTION > 0",
            ));
        }
        let g = &irq.gravity_base;
        if !(g.compression > g.starvation && g.starvation > g.ascent && g.ascent >= g.distribution)
        {
            return Err(invalid(
                "gravity bases must satisfy COMPRESSION > STARVATION > ASCENT >= DISTRIBUTION",
            ));
        }
        for regime in Regime::ALL {
            let beta = irq.custody_beta.get(*regime).abs();
            if !(0.05..=0.10).contains(&beta) {
                return Err(invalid(format!(
                    "custody beta for {} must have magnitude in [0.05, 0.10], got {}",
                    regime, beta
                )));
            }
        }
        if !(irq.gravity_floor > 0.0 && irq.gravity_floor < 1.0) {
            return Err(invalid("gravity_floor must lie in (0, 1)"));
        }
        if !(irq.primed_ratio > 0.0 && irq.primed_ratio < 1.0) || irq.floor_margin <= 0.0 {
            return Err(invalid("primed_ratio must lie in (0, 1) and floor_margin be positive"));
        }
        if irq.floor_cti < irq.high_tension_floor {
            return Err(invalid("floor_cti must be at least high_tension_floor"));
        }
        check_ladder("irq.value_knots", &irq.value_knots)?;
        check_ladder("rei.thresholds", &self.rei.thresholds)?;
        check_ladder("uqi.thresholds", &self.uqi.thresholds)?;

        let clocks = &self.clocks;
        if !(0.0 < clocks.intent_drift && clocks.intent_drift < clocks.intent_surge) {
            return Err(invalid("intent thresholds must satisfy 0 < drift < surge"));
        }
        if clocks.regime_min_days > clocks.regime_max_days || clocks.regime_max_days == 0 {
            return Err(invalid("regime window must satisfy 0 < min <= max"));
        }

        let ctx = &self.context;
        if !(ctx.hashrate_strained < ctx.hashrate_distress) || ctx.entropy_band < 0.0 {
            return Err(invalid("context thresholds out of order"));
        }

        let d = &self.distribution;
        if d.temperature <= 0.0 || d.smoothing < 0.0 || d.coil_spread < 0.0 {
            return Err(invalid("distribution parameters must be positive"));
        }

        Ok(())
    }

    /// SHA-256 (hex) over the formula version and canonical JSON of this
    /// configuration
    pub fn fingerprint(&self) -> Result<String, ConfigError> {
        let bytes = serde_json::to_vec(self).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(FORMULA_VERSION.as_bytes());
        hasher.update(b"\n");
        hasher.update(&bytes);
        Ok(hex::encode(hasher.finalize()))
    }

    /// Compare the running fingerprint with a known-good reference
    pub fn verify_integrity(&self, expected: &str) -> Result<String, ConfigError> {
        let actual = self.fingerprint()?;
        if !actual.eq_ignore_ascii_case(expected.trim()) {
            return Err(ConfigError::IntegrityMismatch {
                expected: expected.trim().to_string(),
                actual,
            });
        }
        Ok(actual)
    }
}

fn invalid(reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(reason.into())
}

/// Rungs must leave room for the gap kept below each band's ceiling
fn check_ladder(name: &str, ladder: &[f64; 3]) -> Result<(), ConfigError> {
    let min_gap = 2.0 * BAND_CEILING_GAP;
    let ordered = ladder[0] >= min_gap
        && ladder[1] - ladder[0] >= min_gap
        && ladder[2] - ladder[1] >= min_gap
        && 1.0 - ladder[2] >= min_gap;
    if !ordered {
        return Err(invalid(format!(
            "{} must be increasing inside (0, 1) with rungs at least {} apart, got {:?}",
            name, min_gap, ladder
        )));
    }
    Ok(())
}
