//! Fuse-and-gate machinery shared by IRQ, REI and UQI
//!
//! Each fused index compares a fused pressure `P` against a three-rung
//! threshold ladder, maps `P` onto [0,1] through a monotone piecewise-linear
//! transform, and then applies two caps:
//!
//! 1. index-specific conditions (e.g. IRQ `irreversible` also needs high CTI*)
//! 2. the regime gate: gated bands exist only in COMPRESSION / STARVATION
//!
//! After capping, the numeric value is clamped into the band's own value
//! range so that value thresholds and band labels always agree.

use chainwalk_core::{Band, FusedIndex, FusedReading, GatingViolation, Regime};
use log::warn;

/// Gap kept below the next band's value knot when a value is capped
pub const BAND_CEILING_GAP: f64 = 0.01;

/// Three thresholds in pressure space and the values they map to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ladder {
    /// Pressure at which levels 1, 2 and 3 start
    pub thresholds: [f64; 3],
    /// Index value at each threshold
    pub values: [f64; 3],
}

impl Ladder {
    /// Ladder whose value transform is the identity
    pub fn identity(thresholds: [f64; 3]) -> Self {
        Self {
            thresholds,
            values: thresholds,
        }
    }

    /// Severity level implied by the pressure alone
    pub fn level(&self, pressure: f64) -> u8 {
        self.thresholds.iter().filter(|t| pressure >= **t).count() as u8
    }

    /// Monotone piecewise-linear map through (0,0), the three knots and (1,1).
    ///
    /// Knots at or beyond 1 are dropped, so the map stays well defined when a
    /// high gravity pushes the upper thresholds past the pressure domain.
    pub fn transform(&self, pressure: f64) -> f64 {
        let p = pressure.clamp(0.0, 1.0);

        let mut knots: Vec<(f64, f64)> = Vec::with_capacity(5);
        knots.push((0.0, 0.0));
        for (t, v) in self.thresholds.iter().zip(self.values.iter()) {
            let last_x = knots.last().map(|k| k.0).unwrap_or(0.0);
            if *t > last_x && *t < 1.0 {
                knots.push((*t, *v));
            }
        }
        knots.push((1.0, 1.0));

        for pair in knots.windows(2) {
            let (x0, y0) = pair[0];
            let (x1, y1) = pair[1];
            if p < x1 {
                return y0 + (y1 - y0) * (p - x0) / (x1 - x0);
            }
        }
        1.0
    }

    /// Lowest value a band at `level` may carry
    pub fn band_floor(&self, level: u8) -> f64 {
        match level {
            0 => 0.0,
            l => self.values[(l as usize - 1).min(2)],
        }
    }

    /// Highest value a band at `level` may carry
    pub fn band_ceiling(&self, level: u8) -> f64 {
        match level {
            l if l >= 3 => 1.0,
            l => self.values[l as usize] - BAND_CEILING_GAP,
        }
    }
}

/// A ladder bound to one fused index
#[derive(Debug, Clone, Copy)]
pub struct FusedGate {
    pub index: FusedIndex,
    pub ladder: Ladder,
}

impl FusedGate {
    pub fn new(index: FusedIndex, ladder: Ladder) -> Self {
        Self { index, ladder }
    }

    /// Fuse a pressure into a reading.
    ///
    /// `max_level` is the highest rung the index-specific conditions allow.
    /// The regime gate is applied on top and is not a diagnostic here: a
    /// computed band is simply capped.
    pub fn settle<B: Band>(
        &self,
        pressure: f64,
        gravity: f64,
        max_level: u8,
        regime: Regime,
    ) -> FusedReading<B> {
        let pressure = pressure.clamp(0.0, 1.0);
        let level = self
            .ladder
            .level(pressure)
            .min(max_level)
            .min(regime_cap::<B>(regime));
        self.reading(pressure, gravity, B::from_level(level))
    }

    /// Reading with a caller-chosen band, value kept inside that band
    pub fn forced<B: Band>(&self, pressure: f64, gravity: f64, band: B) -> FusedReading<B> {
        self.reading(pressure.clamp(0.0, 1.0), gravity, band)
    }

    /// Re-check a reading against the regime gate.
    ///
    /// A gated band outside a pressure regime is clamped to the highest
    /// permitted band and reported; it is never a hard error.
    pub fn enforce<B: Band>(
        &self,
        reading: FusedReading<B>,
        regime: Regime,
    ) -> (FusedReading<B>, Option<GatingViolation>) {
        if regime.is_pressure() || !reading.band.is_gated() {
            return (reading, None);
        }

        let clamped = B::from_level(regime_cap::<B>(regime));
        let violation = GatingViolation {
            index: self.index,
            regime,
            attempted: reading.band.to_string(),
            clamped_to: clamped.to_string(),
        };
        warn!("[GATE] {}", violation);

        (
            self.reading(reading.pressure, reading.gravity, clamped),
            Some(violation),
        )
    }

    fn reading<B: Band>(&self, pressure: f64, gravity: f64, band: B) -> FusedReading<B> {
        let level = band.level();
        let value = self
            .ladder
            .transform(pressure)
            .min(self.ladder.band_ceiling(level))
            .max(self.ladder.band_floor(level));
        FusedReading {
            value,
            band,
            pressure,
            gravity,
        }
    }
}

/// Highest level a band type may reach in a regime
fn regime_cap<B: Band>(regime: Regime) -> u8 {
    if regime.is_pressure() {
        u8::MAX
    } else {
        B::gated_from() - 1
    }
}
