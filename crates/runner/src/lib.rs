//! ChainWalk Runner
//!
//! Orchestrates the engine and the ledger around the external sources:
//!
//! - **Sources**: JSONL adapters for features and realized statistics
//! - **Pipeline**: one date end to end, fail-closed on surface mismatch
//! - **Batch**: parallel preparation, in-order fusion and append
//! - **Config**: engine and calibration settings with the integrity pin
//!
//! ## Architecture
//!
//! ```text
//!   features.jsonl                       realized.jsonl
//!        │                                     │
//!        ▼                                     ▼
//! ┌──────────────┐   history   ┌──────────────────────────┐
//! │ FusionEngine │◄────────────│      OutcomeLedger       │──► journal.jsonl
//! └──────┬───────┘             └────────────▲─────────────┘
//!        │ state vector                     │ record / resolve
//!        ▼                                  │
//! ┌──────────────────┐   agree    ┌─────────┴────────┐
//! │ ConsistencyCheck │───────────►│  DailyPipeline   │
//! └──────────────────┘            └─────────┬────────┘
//!                                           ▼
//!                                  CalibrationEngine ──► report
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod sources;

pub use batch::{BatchRunner, BatchSummary};
pub use config::RunConfig;
pub use error::{Result, RunError};
pub use pipeline::{DailyPipeline, DayRun, ResolutionSweep};
pub use sources::{JsonlFeatureSource, JsonlRealizedSource};
