//! Intent and regime clocks
//!
//! Both clocks are driven by streaks, and streaks are derived from the
//! ledger's trailing entries only: the engine keeps no state between days.
//! A streak counts consecutive calendar days ending today; a missing day
//! breaks it, and an entry already stored for today is ignored so that a
//! same-day rerun yields the same clock.

use crate::config::ClockConfig;
use chainwalk_core::{Date, IntentClock, IntentState, Regime, RegimeClock, RegimePhase};
use chrono::Duration;

/// What the clocks need to know about a past day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayMark {
    pub date: Date,
    pub regime: Regime,
    pub intent: IntentState,
}

/// Length of the run of `current` ending on `today`, including today.
///
/// `history` must be sorted by date ascending.
pub fn streak<T: PartialEq>(
    history: &[DayMark],
    today: Date,
    current: T,
    key: impl Fn(&DayMark) -> T,
) -> u32 {
    let mut count = 1;
    let mut expected = today - Duration::days(1);
    for mark in history.iter().rev().filter(|m| m.date < today) {
        if mark.date != expected || key(mark) != current {
            break;
        }
        count += 1;
        expected -= Duration::days(1);
    }
    count
}

#[derive(Debug, Clone, Default)]
pub struct ClockEngine {
    config: ClockConfig,
}

impl ClockEngine {
    pub fn new(config: ClockConfig) -> Self {
        Self { config }
    }

    /// Bucket a mempool intent delta
    pub fn intent_state(&self, delta: f64) -> IntentState {
        let c = &self.config;
        if delta >= c.intent_surge {
            IntentState::Surging
        } else if delta >= c.intent_drift {
            IntentState::Elevating
        } else if delta <= -c.intent_surge {
            IntentState::Purge
        } else if delta <= -c.intent_drift {
            IntentState::Bleeding
        } else {
            IntentState::Neutral
        }
    }

    pub fn intent_clock(&self, state: IntentState, today: Date, history: &[DayMark]) -> IntentClock {
        let streak_days = streak(history, today, state, |m| m.intent);
        let half_life_days = self.config.intent_half_life_days;
        IntentClock {
            state,
            streak_days,
            half_life_days,
            days_remaining: half_life_days.saturating_sub(streak_days),
        }
    }

    pub fn regime_clock(&self, regime: Regime, today: Date, history: &[DayMark]) -> RegimeClock {
        let streak_days = streak(history, today, regime, |m| m.regime);
        let max_total = self.config.regime_max_days;
        let progress = streak_days as f64 / max_total as f64;
        let phase = if progress < 1.0 / 3.0 {
            RegimePhase::Early
        } else if progress < 2.0 / 3.0 {
            RegimePhase::Mid
        } else {
            RegimePhase::Late
        };
        RegimeClock {
            streak_days,
            phase,
            min_remaining: self.config.regime_min_days.saturating_sub(streak_days),
            max_remaining: max_total.saturating_sub(streak_days),
            max_total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2025, 12, day).unwrap()
    }

    fn mark(day: u32, regime: Regime, intent: IntentState) -> DayMark {
        DayMark {
            date: d(day),
            regime,
            intent,
        }
    }

    #[test]
    fn test_intent_buckets() {
        let clocks = ClockEngine::default();
        assert_eq!(clocks.intent_state(0.20), IntentState::Surging);
        assert_eq!(clocks.intent_state(0.02), IntentState::Elevating);
        assert_eq!(clocks.intent_state(0.0), IntentState::Neutral);
        assert_eq!(clocks.intent_state(-0.05), IntentState::Bleeding);
        assert_eq!(clocks.intent_state(-0.15), IntentState::Purge);
    }

    #[test]
    fn test_streak_counts_consecutive_days() {
        let history = vec![
            mark(1, Regime::Ascent, IntentState::Neutral),
            mark(2, Regime::Compression, IntentState::Bleeding),
            mark(3, Regime::Compression, IntentState::Bleeding),
            mark(4, Regime::Compression, IntentState::Neutral),
        ];
        assert_eq!(streak(&history, d(5), Regime::Compression, |m| m.regime), 4);
        assert_eq!(streak(&history, d(5), IntentState::Neutral, |m| m.intent), 2);
        assert_eq!(streak(&history, d(5), Regime::Starvation, |m| m.regime), 1);
    }

    #[test]
    fn test_gap_breaks_streak() {
        let history = vec![
            mark(1, Regime::Compression, IntentState::Neutral),
            mark(2, Regime::Compression, IntentState::Neutral),
            mark(4, Regime::Compression, IntentState::Neutral),
        ];
        assert_eq!(streak(&history, d(5), Regime::Compression, |m| m.regime), 2);
    }

    #[test]
    fn test_same_day_rerun_is_idempotent() {
        let history = vec![
            mark(3, Regime::Compression, IntentState::Neutral),
            mark(4, Regime::Compression, IntentState::Neutral),
        ];
        let first = streak(&history, d(4), Regime::Compression, |m| m.regime);
        assert_eq!(first, 2);
        let mut rerun = history.clone();
        rerun.push(mark(4, Regime::Compression, IntentState::Neutral));
        assert_eq!(streak(&rerun, d(4), Regime::Compression, |m| m.regime), first);
    }

    #[test]
    fn test_intent_clock_counts_down() {
        let clocks = ClockEngine::default();
        let history: Vec<DayMark> = (1..=11)
            .map(|day| mark(day, Regime::Compression, IntentState::Bleeding))
            .collect();
        let clock = clocks.intent_clock(IntentState::Bleeding, d(12), &history);
        assert_eq!(clock.streak_days, 12);
        assert_eq!(clock.days_remaining, 3);

        let long: Vec<DayMark> = (1..=29)
            .map(|day| mark(day, Regime::Compression, IntentState::Bleeding))
            .collect();
        assert!(clocks
            .intent_clock(IntentState::Bleeding, d(30), &long)
            .is_exhausted());
    }

    #[test]
    fn test_regime_clock_phase_and_window() {
        let clocks = ClockEngine::default();
        let fresh = clocks.regime_clock(Regime::Starvation, d(1), &[]);
        assert_eq!(fresh.streak_days, 1);
        assert_eq!(fresh.phase, RegimePhase::Early);
        assert_eq!((fresh.min_remaining, fresh.max_remaining), (39, 69));

        let history: Vec<DayMark> = (1..=29)
            .map(|day| mark(day, Regime::Starvation, IntentState::Neutral))
            .collect();
        let mid = clocks.regime_clock(Regime::Starvation, d(30), &history);
        assert_eq!(mid.streak_days, 30);
        assert_eq!(mid.phase, RegimePhase::Mid);
        assert_eq!((mid.min_remaining, mid.max_remaining), (10, 40));
    }
}
