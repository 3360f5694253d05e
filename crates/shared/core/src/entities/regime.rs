//! Incentive regimes
//!
//! Exactly one regime holds per snapshot.

use super::labels::labelled_enum;

labelled_enum! {
    /// Discrete incentive state of the network
    pub enum Regime {
        /// Tension stored with custody not draining to markets
        Compression => "COMPRESSION",
        /// Custody flowing chainward below peak tension
        Ascent => "ASCENT",
        /// High tension while float is being pulled marketward
        Starvation => "STARVATION",
        /// Float returning to markets at low tension
        Distribution => "DISTRIBUTION",
    }
}

impl Regime {
    /// Regimes in which the severe (gated) bands are reachable
    pub const PRESSURE: [Regime; 2] = [Regime::Compression, Regime::Starvation];

    /// Whether severe bands are permitted in this regime
    pub fn is_pressure(&self) -> bool {
        matches!(self, Regime::Compression | Regime::Starvation)
    }

    /// Stable index into per-regime tables
    pub fn index(&self) -> usize {
        match self {
            Regime::Compression => 0,
            Regime::Ascent => 1,
            Regime::Starvation => 2,
            Regime::Distribution => 3,
        }
    }
}

labelled_enum! {
    /// Coarse position within the current regime streak
    pub enum RegimePhase {
        Early => "EARLY",
        Mid => "MID",
        Late => "LATE",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_pressure_regimes() {
        assert!(Regime::Compression.is_pressure());
        assert!(Regime::Starvation.is_pressure());
        assert!(!Regime::Ascent.is_pressure());
        assert!(!Regime::Distribution.is_pressure());
    }

    #[test]
    fn test_index_is_a_bijection() {
        let mut seen = [false; 4];
        for regime in Regime::ALL {
            assert!(!seen[regime.index()]);
            seen[regime.index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_labels() {
        assert_eq!(Regime::Starvation.as_str(), "STARVATION");
        assert_eq!(Regime::from_str("ASCENT").unwrap(), Regime::Ascent);
        assert!(Regime::from_str("ascent").is_err());
        assert_eq!(RegimePhase::from_str("LATE").unwrap(), RegimePhase::Late);
    }
}
