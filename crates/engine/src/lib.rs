//! ChainWalk Constraint Fusion Engine
//!
//! Deterministic mapping from one day's protocol features to a state vector:
//!
//! ```text
//! FeatureSet ─► normalize ─► classify ─► pressure stack ─┐
//!                                                        ├─► IRQ ─► REI ─► UQI ─► assemble ─► StateVector
//!                    ledger history ─► intent / regime clocks ─┘
//! ```
//!
//! The state vector renders to the canonical spine line, and every other
//! rendered surface is checked against that line before anything is
//! published.
//!
//! All thresholds live in a single versioned [`EngineConfig`] whose SHA-256
//! fingerprint is stamped on every snapshot.

pub mod assembler;
pub mod classifier;
pub mod clocks;
pub mod config;
pub mod context;
pub mod distribution;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod fusion;
pub mod irreversibility;
pub mod normalizer;
pub mod pressure;
pub mod resolution;
pub mod spine;
pub mod surface;
pub mod uncertainty;

pub use assembler::SnapshotAssembler;
pub use classifier::{RegimeClassifier, ThresholdClassifier};
pub use clocks::{ClockEngine, DayMark};
pub use config::{EngineConfig, FORMULA_VERSION};
pub use distribution::{Outlook, RegimeDistribution, RegimeOutlook, TransitionMatrix};
pub use engine::{FusionEngine, PreparedDay, day_mark};
pub use error::{ConfigError, EngineError, Result, SpineError, SurfaceMismatch};
pub use fusion::{FusedGate, Ladder};
pub use irreversibility::{IrqInputs, IrreversibilityEngine};
pub use normalizer::normalize;
pub use pressure::PressureStack;
pub use spine::SpineLine;
pub use surface::{ConsistencyCheck, JsonSurface, SpineSurface};
