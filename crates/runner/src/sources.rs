//! JSONL adapters for the source ports
//!
//! Extractors upstream write one JSON object per line: a `FeatureSet` per
//! date for features, a `RealizedStats` per date for outcomes. Both files are
//! loaded fully at startup; a later line for the same date replaces an
//! earlier one.

use chainwalk_core::{Date, FeatureSet, RealizedStats};
use chainwalk_ports::{FeatureSource, RealizedStatsSource, SourceError, SourceResult};
use log::info;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::Path;

fn read_jsonl<T: DeserializeOwned>(path: &Path) -> SourceResult<Vec<T>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| SourceError::Unavailable(format!("{}: {}", path.display(), e)))?;

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|e| SourceError::Malformed {
                location: format!("{}:{}", path.display(), idx + 1),
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Feature sets keyed by date
#[derive(Debug, Clone, Default)]
pub struct JsonlFeatureSource {
    name: String,
    days: BTreeMap<Date, FeatureSet>,
}

impl JsonlFeatureSource {
    pub fn from_file(path: impl AsRef<Path>) -> SourceResult<Self> {
        let path = path.as_ref();
        let records: Vec<FeatureSet> = read_jsonl(path)?;
        info!("[RUN] Loaded {} feature sets from {}", records.len(), path.display());
        Ok(Self::from_records(path.display().to_string(), records))
    }

    pub fn from_records(name: impl Into<String>, records: Vec<FeatureSet>) -> Self {
        Self {
            name: name.into(),
            days: records.into_iter().map(|f| (f.date, f)).collect(),
        }
    }

    /// Feature sets dated on or before `as_of`, ascending
    pub fn up_to(&self, as_of: Date) -> Vec<FeatureSet> {
        self.days.range(..=as_of).map(|(_, f)| f.clone()).collect()
    }
}

impl FeatureSource for JsonlFeatureSource {
    fn features(&self, date: Date) -> SourceResult<FeatureSet> {
        self.days
            .get(&date)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(date.to_string()))
    }

    fn available_dates(&self) -> SourceResult<Vec<Date>> {
        Ok(self.days.keys().copied().collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Realized statistics keyed by snapshot date
#[derive(Debug, Clone, Default)]
pub struct JsonlRealizedSource {
    name: String,
    days: BTreeMap<Date, RealizedStats>,
}

impl JsonlRealizedSource {
    pub fn from_file(path: impl AsRef<Path>) -> SourceResult<Self> {
        let path = path.as_ref();
        let records: Vec<RealizedStats> = read_jsonl(path)?;
        info!("[RUN] Loaded {} realized records from {}", records.len(), path.display());
        Ok(Self::from_records(path.display().to_string(), records))
    }

    pub fn from_records(name: impl Into<String>, records: Vec<RealizedStats>) -> Self {
        Self {
            name: name.into(),
            days: records.into_iter().map(|r| (r.date, r)).collect(),
        }
    }
}

impl RealizedStatsSource for JsonlRealizedSource {
    fn realized(&self, date: Date) -> SourceResult<RealizedStats> {
        self.days
            .get(&date)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(date.to_string()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("chainwalk-src-{}-{}", std::process::id(), name));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_features_jsonl() {
        let path = write_temp(
            "features.jsonl",
            r#"{"date":"2026-01-02","block_height":930144,"values":{"chain_tension":6.1,"custody_streak":3,"miner_stress":0.4,"epoch_tension":0.3,"mempool_intent_delta":0.01,"entropy_deviation":0.0},"custody_direction":"chainward"}

{"date":"2026-01-01","block_height":930000,"values":{"chain_tension":5.0},"custody_direction":"neutral"}
"#,
        );
        let source = JsonlFeatureSource::from_file(&path).unwrap();
        let dates = source.available_dates().unwrap();
        assert_eq!(dates.len(), 2);
        assert!(dates[0] < dates[1]);

        let day = source.features(dates[1]).unwrap();
        assert_eq!(day.block_height, 930_144);
        assert!(day.missing().is_empty());
        assert_eq!(source.up_to(dates[0]).len(), 1);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_price_field_is_malformed() {
        let path = write_temp(
            "price.jsonl",
            r#"{"date":"2026-01-01","block_height":1,"values":{"btc_price":97000.0}}"#,
        );
        let err = JsonlFeatureSource::from_file(&path).unwrap_err();
        assert!(matches!(err, SourceError::Malformed { location, .. } if location.ends_with(":1")));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_realized_date() {
        let source = JsonlRealizedSource::from_records("mem", vec![]);
        assert!(matches!(
            source.realized(Date::from_ymd_opt(2026, 1, 1).unwrap()),
            Err(SourceError::NotFound(_))
        ));
    }
}
