//! Calibration Engine
//!
//! Scores the engine's own forecasts against resolved outcomes in the
//! ledger. Every query is read-only; a window with fewer than `min_samples`
//! resolved days is refused with `InsufficientSample`.
//!
//! # Usage
//!
//! ```rust,ignore
//! let calibrator = CalibrationEngine::new(CalibrationConfig::default(), ledger)?;
//! let brier = calibrator.brier(Window::trailing(90, as_of))?;
//! let report = calibrator.report(as_of, None);
//! ```

use crate::config::CalibrationConfig;
use crate::error::{CalibrationError, Result};
use crate::forecast::Forecaster;
use crate::ledger::{OutcomeLedger, ResolvedDay, Window};
use crate::metrics::{self, ReliabilityBin, ScoreVariant};
use crate::report::{
    BandStats, CalibrationReport, HighVolHits, HonestyCheck, Metric, OutlookReport, VariantAuc,
    WindowReport,
};
use chainwalk_core::{Date, IrqBand, StateVector};
use chainwalk_engine::{RegimeDistribution, RegimeOutlook};
use log::{debug, info};
use std::sync::Arc;

pub struct CalibrationEngine {
    config: CalibrationConfig,
    forecaster: Forecaster,
    ledger: Arc<OutcomeLedger>,
}

impl CalibrationEngine {
    pub fn new(config: CalibrationConfig, ledger: Arc<OutcomeLedger>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            forecaster: Forecaster::new(config.forecast.clone()),
            config,
            ledger,
        })
    }

    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Arc<OutcomeLedger> {
        &self.ledger
    }

    pub fn implied_probability(&self, state: &StateVector) -> f64 {
        self.forecaster.implied_probability(state)
    }

    pub fn brier(&self, window: Window) -> Result<f64> {
        let days = self.sample(window, "brier")?;
        let forecasts = self.forecasts(&days);
        metrics::brier(&forecasts).ok_or(CalibrationError::InsufficientSample {
            metric: "brier",
            needed: self.config.min_samples,
            found: 0,
        })
    }

    pub fn reliability_curve(&self, window: Window, n_bins: usize) -> Result<Vec<ReliabilityBin>> {
        let days = self.sample(window, "reliability")?;
        Ok(metrics::reliability_curve(&self.forecasts(&days), n_bins))
    }

    pub fn roc_auc(&self, window: Window, variant: ScoreVariant) -> Result<f64> {
        let days = self.sample(window, "roc_auc")?;
        let scored: Vec<(f64, bool)> = days
            .iter()
            .map(|d| (variant.score(&d.state), d.outcome.event))
            .collect();

        metrics::roc_auc(&scored).ok_or_else(|| {
            let events = scored.iter().filter(|(_, e)| *e).count();
            CalibrationError::SingleClass {
                metric: "roc_auc",
                events,
                non_events: scored.len() - events,
            }
        })
    }

    /// Share of irreversible / protocol-floor days that resolved with low
    /// realized volatility and no regime break
    pub fn honesty_check(&self, window: Window) -> Result<HonestyCheck> {
        let days = self.sample(window, "honesty")?;
        let gated: Vec<&ResolvedDay> = days
            .iter()
            .filter(|d| d.state.irq.band >= IrqBand::Irreversible)
            .collect();
        let dishonest = gated
            .iter()
            .filter(|d| {
                d.outcome.stats.realized_vol < d.outcome.vol_threshold
                    && !d.outcome.stats.regime_break
            })
            .count();

        Ok(HonestyCheck {
            gated_days: gated.len(),
            dishonest_days: dishonest,
            dishonest_fraction: ratio(dishonest, gated.len()),
        })
    }

    /// Day count, event frequency and Brier per IRQ band present in the window
    pub fn band_stats(&self, window: Window) -> Result<Vec<BandStats>> {
        let days = self.sample(window, "band_stats")?;
        let mut stats = Vec::new();

        for band in IrqBand::ALL {
            let forecasts: Vec<(f64, bool)> = days
                .iter()
                .filter(|d| d.state.irq.band == *band)
                .map(|d| (self.implied_probability(&d.state), d.outcome.event))
                .collect();
            let Some(brier) = metrics::brier(&forecasts) else {
                continue;
            };
            let events = forecasts.iter().filter(|(_, e)| *e).count();
            stats.push(BandStats {
                band: *band,
                days: forecasts.len(),
                events,
                event_frequency: events as f64 / forecasts.len() as f64,
                brier,
            });
        }
        Ok(stats)
    }

    /// Hit rate of days flagged high-vol (pressure regime and raw CTI at or
    /// above the configured floor)
    pub fn high_vol_hits(&self, window: Window) -> Result<HighVolHits> {
        let days = self.sample(window, "high_vol")?;
        let flagged: Vec<&ResolvedDay> = days
            .iter()
            .filter(|d| {
                d.state.regime.is_pressure()
                    && d.state.pressure.cti.raw >= self.config.high_vol_cti
            })
            .collect();
        let hits = flagged
            .iter()
            .filter(|d| d.outcome.stats.realized_vol >= d.outcome.vol_threshold)
            .count();

        Ok(HighVolHits {
            flagged: flagged.len(),
            hits,
            hit_rate: ratio(hits, flagged.len()),
        })
    }

    /// Carry today's distribution forward through the ledger's transitions
    pub fn regime_outlook(
        &self,
        outlook: &RegimeOutlook,
        today: RegimeDistribution,
    ) -> OutlookReport {
        let transitions = outlook.transitions(&self.ledger.regime_sequence());
        let projected = transitions.propagate(&today, self.config.outlook_days);
        OutlookReport {
            horizon_days: self.config.outlook_days,
            outlook: outlook.classify(&projected),
            today,
            projected,
            transitions,
        }
    }

    /// Every configured window ending on `as_of`
    pub fn report(&self, as_of: Date, outlook: Option<OutlookReport>) -> CalibrationReport {
        let windows = self
            .config
            .windows
            .iter()
            .map(|days| self.window_report(Window::trailing(*days, as_of)))
            .collect();

        let report = CalibrationReport {
            as_of,
            recorded: self.ledger.len(),
            resolved: self.ledger.resolved_count(),
            windows,
            outlook,
        };
        info!(
            "[CALIBRATION] Report as of {}: {} recorded, {} resolved",
            as_of, report.recorded, report.resolved
        );
        report
    }

    fn window_report(&self, window: Window) -> WindowReport {
        let samples = self.ledger.resolved_in(window).len();
        let auc = ScoreVariant::ALL
            .iter()
            .map(|variant| VariantAuc {
                variant: *variant,
                auc: self.roc_auc(window, *variant).into(),
            })
            .collect();

        WindowReport {
            days: window.days,
            start: window.start(),
            end: window.end,
            samples,
            brier: self.brier(window).into(),
            bands: self.band_stats(window).into(),
            reliability: self
                .reliability_curve(window, self.config.reliability_bins)
                .into(),
            auc,
            honesty: self.honesty_check(window).into(),
            high_vol: Metric::from(self.high_vol_hits(window)),
        }
    }

    fn sample(&self, window: Window, metric: &'static str) -> Result<Vec<ResolvedDay>> {
        let days = self.ledger.resolved_in(window);
        if days.len() < self.config.min_samples {
            debug!(
                "[CALIBRATION] {} bootstrap over {}d: {} of {} samples",
                metric,
                window.days,
                days.len(),
                self.config.min_samples
            );
            return Err(CalibrationError::InsufficientSample {
                metric,
                needed: self.config.min_samples,
                found: days.len(),
            });
        }
        Ok(days)
    }

    fn forecasts(&self, days: &[ResolvedDay]) -> Vec<(f64, bool)> {
        days.iter()
            .map(|d| (self.implied_probability(&d.state), d.outcome.event))
            .collect()
    }
}

fn ratio(part: usize, whole: usize) -> Option<f64> {
    if whole == 0 {
        None
    } else {
        Some(part as f64 / whole as f64)
    }
}
