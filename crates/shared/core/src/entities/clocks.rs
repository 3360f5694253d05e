//! Countdown clocks carried on each snapshot

use super::context::IntentState;
use super::regime::RegimePhase;
use serde::{Deserialize, Serialize};

/// How long the current mempool intent state has persisted, and how much
/// patience remains before it collapses into resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentClock {
    pub state: IntentState,
    /// Days in the current intent state, including today
    pub streak_days: u32,
    pub half_life_days: u32,
    /// max(0, half_life − streak)
    pub days_remaining: u32,
}

impl IntentClock {
    /// Patience has run out
    pub fn is_exhausted(&self) -> bool {
        self.days_remaining == 0
    }

    /// Fraction of the half-life already consumed, in [0,1]
    pub fn exhaustion(&self) -> f64 {
        if self.half_life_days == 0 {
            return 1.0;
        }
        (1.0 - self.days_remaining as f64 / self.half_life_days as f64).clamp(0.0, 1.0)
    }
}

/// Position within the current regime streak against the historical window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeClock {
    /// Days in the current regime, including today
    pub streak_days: u32,
    pub phase: RegimePhase,
    pub min_remaining: u32,
    pub max_remaining: u32,
    /// Longest regime streak the window allows
    pub max_total: u32,
}

impl RegimeClock {
    /// Fraction of the maximum regime length already consumed, in [0,1]
    pub fn progress(&self) -> f64 {
        if self.max_total == 0 {
            return 1.0;
        }
        (self.streak_days as f64 / self.max_total as f64).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_exhaustion() {
        let clock = IntentClock {
            state: IntentState::Bleeding,
            streak_days: 12,
            half_life_days: 15,
            days_remaining: 3,
        };
        assert!(!clock.is_exhausted());
        assert!((clock.exhaustion() - 0.8).abs() < 1e-12);

        let spent = IntentClock {
            days_remaining: 0,
            streak_days: 20,
            ..clock
        };
        assert!(spent.is_exhausted());
        assert_eq!(spent.exhaustion(), 1.0);
    }

    #[test]
    fn test_regime_progress() {
        let clock = RegimeClock {
            streak_days: 35,
            phase: RegimePhase::Mid,
            min_remaining: 5,
            max_remaining: 35,
            max_total: 70,
        };
        assert!((clock.progress() - 0.5).abs() < 1e-12);
    }
}
