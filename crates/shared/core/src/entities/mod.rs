mod bands;
mod clocks;
mod context;
mod feature;
mod indices;
mod labels;
mod outcome;
mod reading;
mod regime;
mod state_vector;

pub use bands::{
    Band, CtiBand, EtiBand, HashrateBand, IrqBand, MtiBand, ReiBand, UqiBand,
};
pub use clocks::{IntentClock, RegimeClock};
pub use context::{EntropyState, IntentState, PriceCorridor};
pub use feature::{
    CustodyDirection, Feature, FeatureContext, FeatureSet, HashrateTrend, NormalizedFeatures,
};
pub use indices::{FusedIndex, FusedReading, GatingViolation, IndexReading, PressureIndices};
pub use labels::{UnknownLabel, sanitize_label};
pub use outcome::{OutcomeRecord, RealizedDirection, RealizedStats};
pub use reading::SurfaceReading;
pub use regime::{Regime, RegimePhase};
pub use state_vector::{CustodyVector, HashrateState, MinerCohort, StateVector};
