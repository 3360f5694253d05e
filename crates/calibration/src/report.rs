//! Calibration report
//!
//! Read-only view over trailing windows of the ledger. A metric without
//! enough resolved days is reported as `Bootstrap`, never as a number.

use crate::error::CalibrationError;
use crate::metrics::{ReliabilityBin, ScoreVariant};
use chainwalk_core::{Date, IrqBand};
use chainwalk_engine::{Outlook, RegimeDistribution, TransitionMatrix};
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Metric<T> {
    Scored { value: T },
    Bootstrap { reason: String },
}

impl<T> Metric<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Metric::Scored { value } => Some(value),
            Metric::Bootstrap { .. } => None,
        }
    }

    pub fn is_bootstrap(&self) -> bool {
        matches!(self, Metric::Bootstrap { .. })
    }
}

impl<T> From<Result<T, CalibrationError>> for Metric<T> {
    fn from(result: Result<T, CalibrationError>) -> Self {
        match result {
            Ok(value) => Metric::Scored { value },
            Err(e) => Metric::Bootstrap {
                reason: e.to_string(),
            },
        }
    }
}

/// Event frequency and Brier for the days in one IRQ band
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandStats {
    pub band: IrqBand,
    pub days: usize,
    pub events: usize,
    pub event_frequency: f64,
    pub brier: f64,
}

/// Gated IRQ days that resolved quietly
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HonestyCheck {
    /// Days banded irreversible or protocol-floor
    pub gated_days: usize,
    /// Of those, days with low realized vol and no regime break
    pub dishonest_days: usize,
    /// `None` when no day was gated
    pub dishonest_fraction: Option<f64>,
}

/// How often flagged high-vol days delivered
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighVolHits {
    pub flagged: usize,
    pub hits: usize,
    pub hit_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantAuc {
    pub variant: ScoreVariant,
    pub auc: Metric<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowReport {
    pub days: u32,
    pub start: Date,
    pub end: Date,
    /// Resolved days inside the window
    pub samples: usize,
    pub brier: Metric<f64>,
    pub bands: Metric<Vec<BandStats>>,
    pub reliability: Metric<Vec<ReliabilityBin>>,
    pub auc: Vec<VariantAuc>,
    pub honesty: Metric<HonestyCheck>,
    pub high_vol: Metric<HighVolHits>,
}

/// Today's regime distribution carried forward through the ledger's
/// transition matrix
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlookReport {
    pub horizon_days: u32,
    pub today: RegimeDistribution,
    pub projected: RegimeDistribution,
    pub outlook: Outlook,
    pub transitions: TransitionMatrix,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalibrationReport {
    pub as_of: Date,
    pub recorded: usize,
    pub resolved: usize,
    pub windows: Vec<WindowReport>,
    pub outlook: Option<OutlookReport>,
}

impl CalibrationReport {
    /// Plain-text summary for logs and the terminal
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Calibration as of {} ({} recorded, {} resolved)",
            self.as_of, self.recorded, self.resolved
        );

        for w in &self.windows {
            let _ = writeln!(
                out,
                "  {}d [{}..{}] samples={} brier={}",
                w.days,
                w.start,
                w.end,
                w.samples,
                fmt_metric(&w.brier, |b| format!("{:.3}", b))
            );
            for entry in &w.auc {
                let _ = writeln!(
                    out,
                    "    AUC {:<8} {}",
                    entry.variant.to_string(),
                    fmt_metric(&entry.auc, |a| format!("{:.3}", a))
                );
            }
            if let Some(bands) = w.bands.value() {
                for b in bands {
                    let _ = writeln!(
                        out,
                        "    {:<15} days={:<4} freq={:.2} brier={:.3}",
                        b.band.to_string(),
                        b.days,
                        b.event_frequency,
                        b.brier
                    );
                }
            }
            let _ = writeln!(
                out,
                "    honesty {}",
                fmt_metric(&w.honesty, |h| match h.dishonest_fraction {
                    Some(f) => format!("{}/{} quiet ({:.2})", h.dishonest_days, h.gated_days, f),
                    None => "no gated days".to_string(),
                })
            );
            let _ = writeln!(
                out,
                "    high-vol {}",
                fmt_metric(&w.high_vol, |h| match h.hit_rate {
                    Some(r) => format!("{}/{} hit ({:.2})", h.hits, h.flagged, r),
                    None => "none flagged".to_string(),
                })
            );
        }

        if let Some(o) = &self.outlook {
            let _ = writeln!(out, "  outlook {}d: {}", o.horizon_days, o.outlook);
        }
        out
    }
}

fn fmt_metric<T>(metric: &Metric<T>, f: impl Fn(&T) -> String) -> String {
    match metric {
        Metric::Scored { value } => f(value),
        Metric::Bootstrap { .. } => "bootstrap".to_string(),
    }
}
