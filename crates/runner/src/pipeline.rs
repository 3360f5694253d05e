//! Daily pipeline
//!
//! One date end to end: features are fused against the ledger's trailing
//! history, every registered surface is checked against the canonical spine
//! line, and only then is the snapshot appended. A mismatch rejects the date
//! and nothing is recorded.
//!
//! ```text
//! FeatureSet ─► prepare ─► complete(history) ─► surface check ─► ledger.record
//! ```

use crate::error::{Result, RunError};
use chainwalk_calibration::{LedgerError, OutcomeLedger};
use chainwalk_core::{Date, FeatureSet, OutcomeRecord, StateVector};
use chainwalk_engine::{ConsistencyCheck, FusionEngine, PreparedDay};
use chainwalk_ports::{RealizedStatsSource, SourceError};
use log::{debug, error, info};
use std::sync::Arc;

/// What one published date produced
#[derive(Debug, Clone, PartialEq)]
pub struct DayRun {
    pub state: StateVector,
    /// Canonical spine line
    pub spine: String,
    /// (surface name, rendering) for every registered surface
    pub surfaces: Vec<(String, String)>,
}

/// Outcome of a resolution sweep
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionSweep {
    pub resolved: Vec<OutcomeRecord>,
    /// Dates whose horizon has not elapsed or whose stats are not yet supplied
    pub pending: Vec<Date>,
}

pub struct DailyPipeline {
    engine: Arc<FusionEngine>,
    ledger: Arc<OutcomeLedger>,
    surfaces: ConsistencyCheck,
}

impl DailyPipeline {
    pub fn new(
        engine: Arc<FusionEngine>,
        ledger: Arc<OutcomeLedger>,
        surfaces: ConsistencyCheck,
    ) -> Self {
        info!(
            "[RUN] Pipeline ready with surfaces {:?}",
            surfaces.surface_names()
        );
        Self {
            engine,
            ledger,
            surfaces,
        }
    }

    pub fn engine(&self) -> &Arc<FusionEngine> {
        &self.engine
    }

    pub fn ledger(&self) -> &Arc<OutcomeLedger> {
        &self.ledger
    }

    /// Fuse, verify and record one date
    pub fn run_day(&self, raw: &FeatureSet) -> Result<DayRun> {
        let prepared = self.engine.prepare(raw)?;
        self.publish(prepared)
    }

    /// Finish a prepared date against the ledger, verify and record it
    pub fn publish(&self, day: PreparedDay) -> Result<DayRun> {
        let date = day.date();
        let history = self.ledger.history(date);
        let state = self.engine.complete(day, &history)?;

        let (spine, surfaces) = self.surfaces.verify(&state).map_err(|mismatch| {
            error!("[RUN] {} rejected: {}", date, mismatch);
            RunError::SurfaceMismatch(mismatch)
        })?;

        self.ledger.record(state.clone())?;
        info!("[RUN] {}", spine);

        Ok(DayRun {
            state,
            spine,
            surfaces,
        })
    }

    /// Resolve every recorded date the source has statistics for and whose
    /// horizon has elapsed
    pub fn resolve_due(&self, source: &dyn RealizedStatsSource) -> Result<ResolutionSweep> {
        let mut sweep = ResolutionSweep::default();

        for date in self.ledger.unresolved() {
            let stats = match source.realized(date) {
                Ok(stats) => stats,
                Err(SourceError::NotFound(_)) => {
                    sweep.pending.push(date);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            match self.ledger.resolve(date, stats) {
                Ok(outcome) => sweep.resolved.push(outcome),
                Err(LedgerError::HorizonNotElapsed { resolvable_on, .. }) => {
                    debug!("[RUN] {} resolvable on {}", date, resolvable_on);
                    sweep.pending.push(date);
                }
                Err(e) => return Err(e.into()),
            }
        }

        info!(
            "[RUN] Resolution sweep via {}: {} resolved, {} pending",
            source.name(),
            sweep.resolved.len(),
            sweep.pending.len()
        );
        Ok(sweep)
    }
}
