//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application
//! settings. Configuration is loaded from a TOML file.
//!
//! # Example
//!
//! ```no_run
//! use fundwatch::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("fundwatch.toml")?;
//!     config.logging.init();
//!     Ok(())
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use super::logging::LoggingConfig;
use super::scan::{MonitorConfig, ScanConfig, ScanOverrides};
use super::venue::VenuesConfig;
use crate::application::{Annualization, ScanQuery};
use crate::domain::{Instrument, Venue};
use crate::error::{ConfigError, Result};

/// Default config file name, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "fundwatch.toml";

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Query parameters for `scan` and `watch`.
    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Settlement cadence assumptions for yield projection.
    #[serde(default)]
    pub annualization: Annualization,

    #[serde(default)]
    pub venues: VenuesConfig,

    /// Asset to per-venue instrument symbol.
    #[serde(default)]
    pub instruments: BTreeMap<String, BTreeMap<Venue, Instrument>>,
}

impl Config {
    /// Parse and validate configuration from TOML content.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Check every section. The `[scan]` query is checked as configured,
    /// before any command-line override.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.logging.validate()?;
        self.monitor.validate()?;
        self.annualization.validate()?;
        self.venues.validate()?;

        for (asset, mapping) in &self.instruments {
            if let Some((venue, _)) = mapping.iter().find(|(_, i)| i.as_str().trim().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    field: "instruments",
                    reason: format!("{asset}.{venue} must not be empty"),
                });
            }
        }

        self.scan_query(&ScanOverrides::default()).map(|_| ())
    }

    /// The validated query after applying command-line overrides.
    pub fn scan_query(
        &self,
        overrides: &ScanOverrides,
    ) -> std::result::Result<ScanQuery, ConfigError> {
        let query = self.scan.merged(overrides).query()?;
        if !self.instruments.contains_key(&query.asset) {
            return Err(ConfigError::InvalidValue {
                field: "scan.asset",
                reason: format!("no [instruments.{}] mapping", query.asset),
            });
        }
        Ok(query)
    }

    /// Instrument mapping for `asset`, limited to enabled venues.
    #[must_use]
    pub fn instruments_for(&self, asset: &str) -> BTreeMap<Venue, Instrument> {
        self.instruments
            .get(asset)
            .map(|mapping| {
                mapping
                    .iter()
                    .filter(|(venue, _)| self.venues.is_enabled(**venue))
                    .map(|(venue, instrument)| (*venue, instrument.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub const fn fetch_deadline(&self) -> Duration {
        Duration::from_millis(self.monitor.fetch_deadline_ms)
    }

    #[must_use]
    pub const fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.monitor.refresh_interval_secs)
    }
}
