//! Canonical spine line
//!
//! One pipe-delimited line per date, order-sensitive:
//!
//! ```text
//! CWSPINE v0.1 | 2025-12-08 | R=STARVATION,EARLY | CTI=8.6 | CUST=marketward(12) | ENT=flat
//!   | PC=permitted | ID=-0.05 | IC=3d | RC=28-58d | HR=rising,distress,0.82 | TH=forced,0.82
//!   | EP=balanced,0.41 | MC=none,na | IRQ=irreversible,0.89 | REI=charged,0.31
//!   | UQI=narrowing,0.50 | OIH=1a2b3c4d
//! ```
//!
//! (wrapped here for width; the real line has no breaks). `REI`, `UQI` and
//! `OIH` are optional trailing fields but keep that order when present.
//!
//! Numbers are fixed-scale decimals (CTI one place, everything else two), so
//! rendering a parsed line reproduces it exactly and parsing a rendered line
//! reproduces the values that produced it.

use crate::error::SpineError;
use chainwalk_core::{
    CustodyDirection, Date, EntropyState, EtiBand, HashrateBand, HashrateTrend, IrqBand, MtiBand,
    PriceCorridor, Regime, RegimePhase, ReiBand, StateVector, SurfaceReading, UqiBand,
};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::iter::Peekable;
use std::str::FromStr;

pub const SPINE_TAG: &str = "CWSPINE";
pub const SPINE_VERSION: (u32, u32) = (0, 1);

const FIELD_SEP: &str = " | ";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parsed (or about to be rendered) spine line
#[derive(Debug, Clone, PartialEq)]
pub struct SpineLine {
    pub date: Date,
    pub regime: Regime,
    pub phase: RegimePhase,
    /// Raw CTI, one decimal place
    pub cti: Decimal,
    pub custody: CustodyDirection,
    pub custody_streak: u32,
    pub entropy: EntropyState,
    pub corridor: PriceCorridor,
    pub incentive_delta: Decimal,
    /// Intent clock days remaining
    pub intent_days: u32,
    pub regime_min_remaining: u32,
    pub regime_max_remaining: u32,
    pub hashrate_trend: HashrateTrend,
    pub hashrate_band: HashrateBand,
    pub hashrate_stress: Decimal,
    pub mti_band: MtiBand,
    pub mti: Decimal,
    pub eti_band: EtiBand,
    pub eti: Decimal,
    pub cohort: String,
    pub pool: String,
    pub irq_band: IrqBand,
    pub irq: Decimal,
    pub rei: Option<(ReiBand, Decimal)>,
    pub uqi: Option<(UqiBand, Decimal)>,
    /// Last eight hex characters of the feature fingerprint
    pub oih: Option<String>,
}

/// Round half away from zero to a fixed scale; zero is never negative
pub fn quantize(value: f64, dp: u32) -> Decimal {
    let mut d = Decimal::from_f64(value)
        .unwrap_or(Decimal::ZERO)
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    d.rescale(dp);
    if d.is_zero() {
        d.set_sign_positive(true);
    }
    d
}

impl SpineLine {
    pub fn from_state(state: &StateVector) -> Self {
        Self {
            date: state.date,
            regime: state.regime,
            phase: state.regime_clock.phase,
            cti: quantize(state.pressure.cti.raw, 1),
            custody: state.custody.direction,
            custody_streak: state.custody.streak,
            entropy: state.entropy,
            corridor: state.corridor,
            incentive_delta: quantize(state.incentive_delta, 2),
            intent_days: state.intent_clock.days_remaining,
            regime_min_remaining: state.regime_clock.min_remaining,
            regime_max_remaining: state.regime_clock.max_remaining,
            hashrate_trend: state.hashrate.trend,
            hashrate_band: state.hashrate.band,
            hashrate_stress: quantize(state.hashrate.stress, 2),
            mti_band: state.pressure.mti.band,
            mti: quantize(state.pressure.mti.normalized, 2),
            eti_band: state.pressure.eti.band,
            eti: quantize(state.pressure.eti.normalized, 2),
            cohort: state.cohort.tilt.clone(),
            pool: state.cohort.dominant_pool.clone(),
            irq_band: state.irq.band,
            irq: quantize(state.irq.value, 2),
            rei: Some((state.rei.band, quantize(state.rei.value, 2))),
            uqi: Some((state.uqi.band, quantize(state.uqi.value, 2))),
            oih: if state.feature_fingerprint.is_empty() {
                None
            } else {
                Some(state.short_fingerprint().to_string())
            },
        }
    }

    pub fn header() -> String {
        format!("{} v{}.{}", SPINE_TAG, SPINE_VERSION.0, SPINE_VERSION.1)
    }

    /// Field → token pairs, keyed by the line's own field names
    /// (`date` for the date segment)
    pub fn reading(&self) -> SurfaceReading {
        let rendered = self.to_string();
        rendered
            .split(FIELD_SEP)
            .skip(1)
            .map(|part| match part.split_once('=') {
                Some((key, value)) => (key.to_string(), value.to_string()),
                None => ("date".to_string(), part.to_string()),
            })
            .collect()
    }
}

impl fmt::Display for SpineLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{header} | {date} | R={regime},{phase} | CTI={cti:.1} | CUST={cust}({streak}) \
             | ENT={ent} | PC={pc} | ID={id:.2} | IC={ic}d | RC={lo}-{hi}d \
             | HR={trend},{hband},{stress:.2} | TH={tband},{mti:.2} | EP={eband},{eti:.2} \
             | MC={cohort},{pool} | IRQ={iband},{irq:.2}",
            header = Self::header(),
            date = self.date.format(DATE_FORMAT),
            regime = self.regime,
            phase = self.phase,
            cti = self.cti,
            cust = self.custody,
            streak = self.custody_streak,
            ent = self.entropy,
            pc = self.corridor,
            id = self.incentive_delta,
            ic = self.intent_days,
            lo = self.regime_min_remaining,
            hi = self.regime_max_remaining,
            trend = self.hashrate_trend,
            hband = self.hashrate_band,
            stress = self.hashrate_stress,
            tband = self.mti_band,
            mti = self.mti,
            eband = self.eti_band,
            eti = self.eti,
            cohort = self.cohort,
            pool = self.pool,
            iband = self.irq_band,
            irq = self.irq,
        )?;
        if let Some((band, value)) = &self.rei {
            write!(f, " | REI={},{:.2}", band, value)?;
        }
        if let Some((band, value)) = &self.uqi {
            write!(f, " | UQI={},{:.2}", band, value)?;
        }
        if let Some(oih) = &self.oih {
            write!(f, " | OIH={}", oih)?;
        }
        Ok(())
    }
}

type Fields<'a> = Peekable<std::str::Split<'a, &'static str>>;

fn take<'a>(fields: &mut Fields<'a>, key: &'static str) -> Result<&'a str, SpineError> {
    let part = fields.next().ok_or(SpineError::MissingField(key))?;
    match part.split_once('=') {
        Some((k, value)) if k == key => Ok(value),
        _ => Err(SpineError::MissingField(key)),
    }
}

fn take_optional<'a>(fields: &mut Fields<'a>, key: &'static str) -> Option<&'a str> {
    let value = fields
        .peek()
        .copied()
        .and_then(|part| part.split_once('='))
        .filter(|(k, _)| *k == key)
        .map(|(_, v)| v)?;
    fields.next();
    Some(value)
}

fn malformed(field: &'static str, token: &str) -> SpineError {
    SpineError::Malformed {
        field,
        token: token.to_string(),
    }
}

fn pair<'a>(field: &'static str, value: &'a str) -> Result<(&'a str, &'a str), SpineError> {
    value.split_once(',').ok_or_else(|| malformed(field, value))
}

fn decimal(field: &'static str, token: &str, dp: u32) -> Result<Decimal, SpineError> {
    let d = Decimal::from_str(token).map_err(|_| malformed(field, token))?;
    if d.scale() != dp {
        return Err(malformed(field, token));
    }
    Ok(d)
}

fn count(field: &'static str, token: &str) -> Result<u32, SpineError> {
    token.parse::<u32>().map_err(|_| malformed(field, token))
}

fn days<'a>(field: &'static str, token: &'a str) -> Result<&'a str, SpineError> {
    token.strip_suffix('d').ok_or_else(|| malformed(field, token))
}

fn banded<B: FromStr<Err = chainwalk_core::UnknownLabel>>(
    field: &'static str,
    value: &str,
) -> Result<(B, Decimal), SpineError> {
    let (band, v) = pair(field, value)?;
    Ok((band.parse()?, decimal(field, v, 2)?))
}

impl FromStr for SpineLine {
    type Err = SpineError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut fields: Fields<'_> = line.trim().split(FIELD_SEP).peekable();

        let header = fields.next().unwrap_or_default();
        if header != Self::header() {
            return Err(SpineError::Header(header.to_string()));
        }

        let date_token = fields.next().ok_or(SpineError::MissingField("date"))?;
        let date = Date::parse_from_str(date_token, DATE_FORMAT)
            .map_err(|_| malformed("date", date_token))?;

        let (regime, phase) = pair("R", take(&mut fields, "R")?)?;

        let cti = decimal("CTI", take(&mut fields, "CTI")?, 1)?;

        let cust = take(&mut fields, "CUST")?;
        let (custody, streak) = cust
            .strip_suffix(')')
            .and_then(|s| s.split_once('('))
            .ok_or_else(|| malformed("CUST", cust))?;

        let entropy = take(&mut fields, "ENT")?.parse()?;
        let corridor = take(&mut fields, "PC")?.parse()?;
        let incentive_delta = decimal("ID", take(&mut fields, "ID")?, 2)?;
        let intent_days = count("IC", days("IC", take(&mut fields, "IC")?)?)?;

        let rc = days("RC", take(&mut fields, "RC")?)?;
        let (lo, hi) = rc.split_once('-').ok_or_else(|| malformed("RC", rc))?;

        let hr = take(&mut fields, "HR")?;
        let hr_parts: Vec<&str> = hr.split(',').collect();
        let [trend, hband, stress] = hr_parts.as_slice() else {
            return Err(malformed("HR", hr));
        };

        let (mti_band, mti) = banded::<MtiBand>("TH", take(&mut fields, "TH")?)?;
        let (eti_band, eti) = banded::<EtiBand>("EP", take(&mut fields, "EP")?)?;
        let (cohort, pool) = pair("MC", take(&mut fields, "MC")?)?;
        let (irq_band, irq) = banded::<IrqBand>("IRQ", take(&mut fields, "IRQ")?)?;

        let rei = take_optional(&mut fields, "REI")
            .map(|v| banded::<ReiBand>("REI", v))
            .transpose()?;
        let uqi = take_optional(&mut fields, "UQI")
            .map(|v| banded::<UqiBand>("UQI", v))
            .transpose()?;
        let oih = match take_optional(&mut fields, "OIH") {
            Some(v) if v.len() == 8 && v.chars().all(|c| c.is_ascii_hexdigit()) => {
                Some(v.to_string())
            }
            Some(v) => return Err(malformed("OIH", v)),
            None => None,
        };

        if let Some(extra) = fields.next() {
            return Err(SpineError::Trailing(extra.to_string()));
        }

        Ok(Self {
            date,
            regime: regime.parse()?,
            phase: phase.parse()?,
            cti,
            custody: custody.parse()?,
            custody_streak: count("CUST", streak)?,
            entropy,
            corridor,
            incentive_delta,
            intent_days,
            regime_min_remaining: count("RC", lo)?,
            regime_max_remaining: count("RC", hi)?,
            hashrate_trend: trend.parse()?,
            hashrate_band: hband.parse()?,
            hashrate_stress: decimal("HR", stress, 2)?,
            mti_band,
            mti,
            eti_band,
            eti,
            cohort: cohort.to_string(),
            pool: pool.to_string(),
            irq_band,
            irq,
            rei,
            uqi,
            oih,
        })
    }
}
