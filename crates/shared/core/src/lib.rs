//! ChainWalk Core Domain
//!
//! Pure domain types for the constraint fusion engine: feature sets, regimes,
//! bands, index readings, the per-date state vector and outcome records.
//! This crate contains no async, no I/O, and is 100% unit testable.
//!
//! Nothing in here can hold a market price as a computation input: the only
//! market-derived numbers live in [`RealizedStats`], which feeds the outcome
//! ledger and never the engine.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    Band, CtiBand, CustodyDirection, CustodyVector, EntropyState, EtiBand, Feature,
    FeatureContext, FeatureSet, FusedIndex, FusedReading, GatingViolation, HashrateBand,
    HashrateState, HashrateTrend, IndexReading, IntentClock, IntentState, IrqBand, MinerCohort,
    MtiBand, NormalizedFeatures, OutcomeRecord, PressureIndices, PriceCorridor,
    RealizedDirection, RealizedStats, Regime, RegimeClock, RegimePhase, ReiBand, StateVector,
    SurfaceReading, UnknownLabel, UqiBand, sanitize_label,
};
pub use values::{BlockHeight, Date, Timestamp};
