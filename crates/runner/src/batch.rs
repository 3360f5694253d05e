//! Batch runner
//!
//! Backfills many dates at once. The history-free stages (normalize,
//! classify, pressure, context, fingerprint) run in parallel on the blocking
//! pool; fusion and the ledger append then run strictly in date order, since
//! each date's clocks read the days recorded before it.

use crate::error::{Result, RunError};
use crate::pipeline::{DailyPipeline, DayRun};
use chainwalk_calibration::LedgerError;
use chainwalk_core::{Date, FeatureSet};
use chainwalk_engine::PreparedDay;
use log::{info, warn};
use std::sync::Arc;
use tokio::task::JoinSet;
use uuid::Uuid;

/// Summary of one batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub run_id: Uuid,
    pub published: Vec<DayRun>,
    /// Dates already in the ledger, left untouched
    pub duplicates: Vec<Date>,
    /// Dates whose features could not be fused, with the reason
    pub failed: Vec<(Date, String)>,
}

pub struct BatchRunner {
    pipeline: Arc<DailyPipeline>,
}

impl BatchRunner {
    pub fn new(pipeline: Arc<DailyPipeline>) -> Self {
        Self { pipeline }
    }

    /// Run every feature set. Per-date feature and assembly failures skip
    /// that date; a surface mismatch rejects the whole run.
    pub async fn run(&self, days: Vec<FeatureSet>) -> Result<BatchSummary> {
        let run_id = Uuid::new_v4();
        info!("[RUN] Batch {} starting with {} dates", run_id, days.len());

        let mut prepared = self.prepare_all(days).await?;
        prepared.sort_by_key(|(date, _)| *date);

        let mut summary = BatchSummary {
            run_id,
            published: Vec::new(),
            duplicates: Vec::new(),
            failed: Vec::new(),
        };

        for (date, day) in prepared {
            let day = match day {
                Ok(day) => day,
                Err(reason) => {
                    warn!("[RUN] {} skipped: {}", date, reason);
                    summary.failed.push((date, reason));
                    continue;
                }
            };

            match self.pipeline.publish(day) {
                Ok(run) => summary.published.push(run),
                Err(RunError::Ledger(LedgerError::DuplicateDate(d))) => summary.duplicates.push(d),
                Err(RunError::Engine(e)) => summary.failed.push((date, e.to_string())),
                Err(e) => return Err(e),
            }
        }

        info!(
            "[RUN] Batch {} done: {} published, {} duplicates, {} failed",
            run_id,
            summary.published.len(),
            summary.duplicates.len(),
            summary.failed.len()
        );
        Ok(summary)
    }

    async fn prepare_all(
        &self,
        days: Vec<FeatureSet>,
    ) -> Result<Vec<(Date, std::result::Result<PreparedDay, String>)>> {
        let mut tasks = JoinSet::new();
        for raw in days {
            let engine = Arc::clone(self.pipeline.engine());
            tasks.spawn_blocking(move || {
                let prepared = engine.prepare(&raw).map_err(|e| e.to_string());
                (raw.date, prepared)
            });
        }

        let mut prepared = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            prepared.push(joined.map_err(|e| RunError::Join(e.to_string()))?);
        }
        Ok(prepared)
    }
}
