//! Scan query and refresh cadence settings.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::application::ScanQuery;
use crate::domain::Frequency;
use crate::error::ConfigError;

/// `[scan]`: the caller-supplied query. Every field is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ScanConfig {
    pub asset: Option<String>,
    pub lookback_days: Option<u32>,
    /// Grid step, e.g. `"1h"`, `"30m"`, `"1d"`.
    pub resample: Option<String>,
    /// Spread threshold in percent.
    pub threshold_pct: Option<Decimal>,
}

/// Command-line values that replace `[scan]` fields when set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOverrides {
    pub asset: Option<String>,
    pub lookback_days: Option<u32>,
    pub resample: Option<String>,
    pub threshold_pct: Option<Decimal>,
}

impl ScanConfig {
    /// Apply overrides, keeping configured values for unset flags.
    #[must_use]
    pub fn merged(&self, overrides: &ScanOverrides) -> Self {
        Self {
            asset: overrides.asset.clone().or_else(|| self.asset.clone()),
            lookback_days: overrides.lookback_days.or(self.lookback_days),
            resample: overrides.resample.clone().or_else(|| self.resample.clone()),
            threshold_pct: overrides.threshold_pct.or(self.threshold_pct),
        }
    }

    /// Build a validated query.
    pub fn query(&self) -> Result<ScanQuery, ConfigError> {
        let asset = self
            .asset
            .clone()
            .ok_or(ConfigError::MissingField { field: "scan.asset" })?;
        let lookback_days = self.lookback_days.ok_or(ConfigError::MissingField {
            field: "scan.lookback_days",
        })?;
        let resample = self
            .resample
            .as_deref()
            .ok_or(ConfigError::MissingField {
                field: "scan.resample",
            })?;
        let threshold_pct = self.threshold_pct.ok_or(ConfigError::MissingField {
            field: "scan.threshold_pct",
        })?;

        let freq = Frequency::parse(resample).map_err(|err| ConfigError::InvalidValue {
            field: "scan.resample",
            reason: err.to_string(),
        })?;
        ScanQuery::days(asset.trim(), lookback_days, freq, threshold_pct)
    }
}

/// `[monitor]`: periodic refresh behavior.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MonitorConfig {
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// Deadline for one venue's fetch, every page included.
    #[serde(default = "default_fetch_deadline_ms")]
    pub fetch_deadline_ms: u64,
}

const fn default_refresh_interval_secs() -> u64 {
    60
}

const fn default_fetch_deadline_ms() -> u64 {
    15_000
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
            fetch_deadline_ms: default_fetch_deadline_ms(),
        }
    }
}

impl MonitorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "monitor.refresh_interval_secs",
                reason: "must be greater than 0".into(),
            });
        }
        if self.fetch_deadline_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "monitor.fetch_deadline_ms",
                reason: "must be greater than 0".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn complete() -> ScanConfig {
        ScanConfig {
            asset: Some("BTC".into()),
            lookback_days: Some(7),
            resample: Some("1h".into()),
            threshold_pct: Some(dec!(0.01)),
        }
    }

    #[test]
    fn builds_query() {
        let query = complete().query().unwrap();
        assert_eq!(query.asset, "BTC");
        assert_eq!(query.lookback, chrono::Duration::days(7));
        assert_eq!(query.freq, Frequency::hours(1).unwrap());
    }

    #[test]
    fn every_field_is_required() {
        let mut config = complete();
        config.resample = None;
        assert!(matches!(
            config.query(),
            Err(ConfigError::MissingField {
                field: "scan.resample"
            })
        ));
        assert!(matches!(
            ScanConfig::default().query(),
            Err(ConfigError::MissingField { field: "scan.asset" })
        ));
    }

    #[test]
    fn bad_resample_is_invalid() {
        let mut config = complete();
        config.resample = Some("0h".into());
        assert!(matches!(
            config.query(),
            Err(ConfigError::InvalidValue {
                field: "scan.resample",
                ..
            })
        ));
    }

    #[test]
    fn overrides_replace_only_set_fields() {
        let merged = complete().merged(&ScanOverrides {
            asset: Some("ETH".into()),
            threshold_pct: Some(dec!(0.05)),
            ..ScanOverrides::default()
        });
        assert_eq!(merged.asset.as_deref(), Some("ETH"));
        assert_eq!(merged.lookback_days, Some(7));
        assert_eq!(merged.threshold_pct, Some(dec!(0.05)));
    }
}
