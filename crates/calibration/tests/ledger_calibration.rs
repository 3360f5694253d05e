//! Outcome Ledger & Calibration Integration Test
//!
//! Drives the ledger the way the daily run does:
//! 1. Snapshots are recorded once per date
//! 2. Outcomes are resolved only after their horizon has elapsed
//! 3. Implied probabilities are scored against the event labels
//! 4. The journal replays into an identical ledger

use chainwalk_calibration::{
    CalibrationConfig, CalibrationEngine, CalibrationError, EventRule, EventRuleConfig, Journal,
    LedgerError, OutcomeLedger, ScoreVariant, VolThreshold, Window,
};
use chainwalk_clock::FixedClock;
use chainwalk_core::{
    CustodyDirection, Date, Feature, FeatureSet, IrqBand, RealizedDirection, RealizedStats,
    Regime, StateVector,
};
use chainwalk_engine::{EngineConfig, FusionEngine, RegimeDistribution};
use chrono::Duration;
use proptest::prelude::*;
use std::sync::Arc;

fn date(offset: i64) -> Date {
    Date::from_ymd_opt(2026, 1, 1).unwrap() + Duration::days(offset)
}

fn features(day: i64, stress: f64) -> FeatureSet {
    FeatureSet::new(date(day), 930_000 + day as u64 * 144)
        .with(Feature::ChainTension, 5.5)
        .with(Feature::CustodyStreak, 2.0)
        .with(Feature::MinerStress, stress)
        .with(Feature::EpochTension, 0.4)
        .with(Feature::MempoolIntentDelta, 0.0)
        .with(Feature::EntropyDeviation, 0.0)
        .with_custody(CustodyDirection::Neutral)
}

/// Engine snapshot for `day` with the fused pressure overridden
fn state(day: i64, pressure: f64) -> StateVector {
    let engine = FusionEngine::new(EngineConfig::default()).unwrap();
    let mut state = engine.snapshot(&features(day, 0.5), &[]).unwrap();
    state.irq.pressure = pressure;
    state
}

fn stats(day: i64, vol: f64) -> RealizedStats {
    RealizedStats {
        date: date(day),
        horizon_days: 3,
        realized_vol: vol,
        realized_return: 0.01,
        regime_break: false,
        custody_flip: false,
        miner_stress_unwound: false,
    }
}

fn ledger_at(today: Date) -> (Arc<FixedClock>, Arc<OutcomeLedger>) {
    let clock = Arc::new(FixedClock::at_date(today));
    let ledger = Arc::new(OutcomeLedger::new(EventRule::default(), clock.clone()));
    (clock, ledger)
}

#[test]
fn test_flat_forecast_brier_scenario() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (_clock, ledger) = ledger_at(date(30));

    // P = 0.25 maps to p̂ = 0.1 + 0.8 · 0.25 = 0.3 on every day
    for day in 0..10 {
        ledger.record(state(day, 0.25)).unwrap();
    }
    for day in 0..10 {
        let vol = if day % 3 == 0 && day < 9 { 0.08 } else { 0.02 };
        ledger.resolve(date(day), stats(day, vol)).unwrap();
    }

    let calibrator =
        CalibrationEngine::new(CalibrationConfig::default(), ledger.clone()).unwrap();
    let window = Window::trailing(60, date(9));

    assert_eq!(ledger.resolved_in(window).iter().filter(|d| d.outcome.event).count(), 3);
    assert!((calibrator.brier(window).unwrap() - 0.21).abs() < 1e-9);

    let bins = calibrator.reliability_curve(window, 5).unwrap();
    assert_eq!(bins.len(), 1);
    assert!((bins[0].mean_forecast - 0.3).abs() < 1e-9);
    assert!((bins[0].event_rate - 0.3).abs() < 1e-9);

    // Every day shares the same score, so no variant discriminates
    let auc = calibrator.roc_auc(window, ScoreVariant::FusedPressure).unwrap();
    assert!((auc - 0.5).abs() < 1e-12);
}

#[test]
fn test_early_resolution_rejected() {
    let (clock, ledger) = ledger_at(date(2));
    ledger.record(state(0, 0.4)).unwrap();

    let err = ledger.resolve(date(0), stats(0, 0.03)).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::HorizonNotElapsed { resolvable_on, today, .. }
            if resolvable_on == date(3) && today == date(2)
    ));
    assert!(ledger.outcome(date(0)).is_none());

    clock.advance_days(1);
    let outcome = ledger.resolve(date(0), stats(0, 0.03)).unwrap();
    assert_eq!(outcome.resolved_on, date(3));
    assert_eq!(outcome.direction, RealizedDirection::Up);
    assert!(!outcome.event);
}

#[test]
fn test_invalid_horizon_rejected() {
    let (_clock, ledger) = ledger_at(date(0));
    ledger.record(state(0, 0.4)).unwrap();

    // Same-day outcome: nothing observed after the snapshot date
    let mut same_day = stats(0, 0.09);
    same_day.horizon_days = 0;
    let err = ledger.resolve(date(0), same_day).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::InvalidHorizon { date: d, horizon_days: 0 } if d == date(0)
    ));

    // Horizon running past the calendar is an error, not a panic
    let mut endless = stats(0, 0.09);
    endless.horizon_days = u32::MAX;
    let err = ledger.resolve(date(0), endless).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::InvalidHorizon { horizon_days, .. } if horizon_days == u32::MAX
    ));

    assert!(ledger.outcome(date(0)).is_none());
    assert_eq!(ledger.unresolved(), vec![date(0)]);
}

#[test]
fn test_duplicate_and_unknown_dates() {
    let (_clock, ledger) = ledger_at(date(10));
    let original = state(0, 0.4);
    ledger.record(original.clone()).unwrap();

    let err = ledger.record(state(0, 0.9)).unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateDate(d) if d == date(0)));
    assert_eq!(ledger.snapshot(date(0)).unwrap(), original);

    let err = ledger.resolve(date(1), stats(1, 0.03)).unwrap_err();
    assert!(matches!(err, LedgerError::UnknownDate(d) if d == date(1)));

    let err = ledger.resolve(date(0), stats(1, 0.03)).unwrap_err();
    assert!(matches!(err, LedgerError::DateMismatch { .. }));

    ledger.resolve(date(0), stats(0, 0.03)).unwrap();
    let err = ledger.resolve(date(0), stats(0, 0.09)).unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyResolved(_)));
    assert!(!ledger.outcome(date(0)).unwrap().event);
}

#[test]
fn test_small_window_reports_bootstrap() {
    let (_clock, ledger) = ledger_at(date(30));
    for day in 0..5 {
        ledger.record(state(day, 0.3)).unwrap();
        ledger.resolve(date(day), stats(day, 0.02)).unwrap();
    }

    let calibrator =
        CalibrationEngine::new(CalibrationConfig::default(), ledger.clone()).unwrap();
    let err = calibrator.brier(Window::trailing(60, date(4))).unwrap_err();
    assert_eq!(
        err,
        CalibrationError::InsufficientSample {
            metric: "brier",
            needed: 10,
            found: 5
        }
    );

    let report = calibrator.report(date(4), None);
    assert_eq!(report.windows.len(), 3);
    assert!(report.windows.iter().all(|w| w.brier.is_bootstrap()));
    assert!(report.windows[0].auc.iter().all(|a| a.auc.is_bootstrap()));
    assert!(report.summary().contains("bootstrap"));
}

#[test]
fn test_auc_rewards_pressure_that_ranks_events() {
    let (_clock, ledger) = ledger_at(date(40));
    for day in 0..12 {
        let pressure = 0.05 * day as f64;
        ledger.record(state(day, pressure)).unwrap();
        let vol = if day >= 8 { 0.09 } else { 0.01 };
        ledger.resolve(date(day), stats(day, vol)).unwrap();
    }

    let calibrator =
        CalibrationEngine::new(CalibrationConfig::default(), ledger.clone()).unwrap();
    let window = Window::trailing(90, date(11));

    let fused = calibrator.roc_auc(window, ScoreVariant::FusedPressure).unwrap();
    assert!((fused - 1.0).abs() < 1e-12);
    let raw_cti = calibrator.roc_auc(window, ScoreVariant::RawCti).unwrap();
    assert!((raw_cti - 0.5).abs() < 1e-12);

    let report = calibrator.report(date(11), None);
    let w90 = &report.windows[1];
    assert_eq!(w90.samples, 12);
    assert!(!w90.brier.is_bootstrap());
}

#[test]
fn test_auc_single_class_refused() {
    let (_clock, ledger) = ledger_at(date(40));
    for day in 0..10 {
        ledger.record(state(day, 0.3)).unwrap();
        ledger.resolve(date(day), stats(day, 0.01)).unwrap();
    }
    let calibrator =
        CalibrationEngine::new(CalibrationConfig::default(), ledger.clone()).unwrap();
    let err = calibrator
        .roc_auc(Window::trailing(60, date(9)), ScoreVariant::Irq)
        .unwrap_err();
    assert!(matches!(err, CalibrationError::SingleClass { events: 0, non_events: 10, .. }));
}

#[test]
fn test_honesty_band_stats_and_high_vol() {
    let (_clock, ledger) = ledger_at(date(40));
    for day in 0..10 {
        let mut s = state(day, 0.6);
        s.regime = Regime::Compression;
        s.irq.band = if day < 4 {
            IrqBand::Irreversible
        } else {
            IrqBand::Primed
        };
        ledger.record(s).unwrap();

        // One of the four irreversible days stays quiet
        let vol = if day == 0 || day >= 4 { 0.02 } else { 0.08 };
        ledger.resolve(date(day), stats(day, vol)).unwrap();
    }

    let calibrator =
        CalibrationEngine::new(CalibrationConfig::default(), ledger.clone()).unwrap();
    let window = Window::trailing(60, date(9));

    let honesty = calibrator.honesty_check(window).unwrap();
    assert_eq!(honesty.gated_days, 4);
    assert_eq!(honesty.dishonest_days, 1);
    assert!((honesty.dishonest_fraction.unwrap() - 0.25).abs() < 1e-12);

    let bands = calibrator.band_stats(window).unwrap();
    assert_eq!(bands.len(), 2);
    assert_eq!(bands[0].band, IrqBand::Primed);
    assert_eq!(bands[0].days, 6);
    assert_eq!(bands[0].events, 0);
    assert_eq!(bands[1].band, IrqBand::Irreversible);
    assert!((bands[1].event_frequency - 0.75).abs() < 1e-12);

    // Raw CTI 5.5 in COMPRESSION flags every day
    let high_vol = calibrator.high_vol_hits(window).unwrap();
    assert_eq!(high_vol.flagged, 10);
    assert_eq!(high_vol.hits, 3);
}

#[test]
fn test_percentile_threshold_uses_prior_outcomes() {
    let clock = Arc::new(FixedClock::at_date(date(40)));
    let rule = EventRule::new(EventRuleConfig {
        vol_threshold: VolThreshold::Percentile {
            pct: 50.0,
            min_samples: 3,
            fallback: 0.06,
        },
        ..EventRuleConfig::default()
    });
    let ledger = OutcomeLedger::new(rule, clock);

    for day in 0..4 {
        ledger.record(state(day, 0.3)).unwrap();
    }
    ledger.resolve(date(0), stats(0, 0.01)).unwrap();
    ledger.resolve(date(1), stats(1, 0.02)).unwrap();
    let third = ledger.resolve(date(2), stats(2, 0.03)).unwrap();
    assert_eq!(third.vol_threshold, 0.06);
    assert!(!third.event);

    // Median of 0.01, 0.02, 0.03
    let fourth = ledger.resolve(date(3), stats(3, 0.025)).unwrap();
    assert!((fourth.vol_threshold - 0.02).abs() < 1e-12);
    assert!(fourth.event);
}

#[test]
fn test_journal_replay_rebuilds_ledger() {
    let path = std::env::temp_dir().join(format!("chainwalk-ledger-{}.jsonl", std::process::id()));
    let _ = std::fs::remove_file(&path);

    let clock = Arc::new(FixedClock::at_date(date(20)));
    let ledger = OutcomeLedger::new(EventRule::default(), clock.clone())
        .with_journal(Journal::open(&path).unwrap());
    for day in 0..3 {
        ledger.record(state(day, 0.2 * day as f64)).unwrap();
    }
    ledger.resolve(date(1), stats(1, 0.07)).unwrap();
    assert!(ledger.record(state(2, 0.9)).is_err());

    let records = Journal::read(&path).unwrap();
    assert_eq!(records.len(), 4);

    let rebuilt = OutcomeLedger::new(EventRule::default(), clock);
    assert_eq!(rebuilt.replay(records).unwrap(), 4);
    for day in 0..3 {
        assert_eq!(rebuilt.snapshot(date(day)), ledger.snapshot(date(day)));
    }
    assert_eq!(rebuilt.outcome(date(1)), ledger.outcome(date(1)));
    assert_eq!(rebuilt.unresolved(), vec![date(0), date(2)]);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_history_drives_streaks() {
    let (_clock, ledger) = ledger_at(date(30));
    let engine = FusionEngine::new(EngineConfig::default()).unwrap();

    for day in 0..6 {
        let history = ledger.history(date(day));
        let state = engine.snapshot(&features(day, 0.5), &history).unwrap();
        ledger.record(state).unwrap();
    }

    let last = ledger.snapshot(date(5)).unwrap();
    assert_eq!(last.regime_clock.streak_days, 6);
    assert_eq!(ledger.history(date(5)).len(), 5);
    assert_eq!(ledger.regime_sequence(), vec![last.regime; 6]);
    assert_eq!(ledger.latest_date(), Some(date(5)));
}

#[test]
fn test_regime_outlook_follows_ledger_sequence() {
    let (_clock, ledger) = ledger_at(date(60));
    for day in 0..30 {
        let mut s = state(day, 0.3);
        s.regime = Regime::Compression;
        ledger.record(s).unwrap();
    }

    let config = CalibrationConfig::default();
    let engine = FusionEngine::new(EngineConfig::default()).unwrap();
    let calibrator = CalibrationEngine::new(config, ledger).unwrap();

    let outlook =
        calibrator.regime_outlook(engine.outlook(), RegimeDistribution::certain(Regime::Ascent));
    assert_eq!(outlook.horizon_days, 7);
    assert!(
        outlook.projected.probability(Regime::Compression)
            > outlook.projected.probability(Regime::Ascent)
    );
    assert_eq!(
        outlook.outlook,
        chainwalk_engine::Outlook::Biased(Regime::Compression)
    );
}

proptest! {
    #[test]
    fn implied_probability_monotone_in_stress(
        stress in 0.0f64..1.0,
        bump in 0.0f64..0.5,
        cti in 0.0f64..10.0,
    ) {
        let engine = FusionEngine::new(EngineConfig::default()).unwrap();
        let raw = |s: f64| features(0, s).with(Feature::ChainTension, cti);
        let low = engine.snapshot(&raw(stress), &[]).unwrap();
        let high = engine.snapshot(&raw((stress + bump).min(1.0)), &[]).unwrap();

        let mut config = CalibrationConfig::default();
        config.forecast.band_prior = Some(chainwalk_calibration::BandPrior {
            weight: 0.4,
            priors: [0.1, 0.3, 0.6, 0.8],
        });
        let (_clock, ledger) = ledger_at(date(0));
        let calibrator = CalibrationEngine::new(config, ledger).unwrap();

        prop_assert!(high.fused_pressure() >= low.fused_pressure());
        let p_low = calibrator.implied_probability(&low);
        let p_high = calibrator.implied_probability(&high);
        prop_assert!((0.0..=1.0).contains(&p_low));
        prop_assert!(p_high >= p_low);
    }
}
