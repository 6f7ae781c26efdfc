//! Derive venue configuration.

use serde::Deserialize;

use crate::adapter::outbound::http::{validate_base_url, HttpSettings};
use crate::application::FillPolicy;
use crate::error::ConfigError;

/// Sampling periods, in seconds, the history endpoint accepts.
pub const ALLOWED_PERIODS: [u32; 5] = [900, 3600, 14_400, 28_800, 86_400];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeriveSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Optional sampling period in seconds; omitted from requests when unset.
    #[serde(default)]
    pub period: Option<u32>,
    #[serde(default)]
    pub fill: FillPolicy,
}

const fn default_enabled() -> bool {
    true
}

fn default_base_url() -> String {
    "https://api.lyra.finance".into()
}

const fn default_timeout_ms() -> u64 {
    5_000
}

const fn default_connect_timeout_ms() -> u64 {
    3_000
}

impl Default for DeriveSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            period: None,
            fill: FillPolicy::default(),
        }
    }
}

impl DeriveSettings {
    #[must_use]
    pub const fn http(&self) -> HttpSettings {
        HttpSettings {
            timeout_ms: self.timeout_ms,
            connect_timeout_ms: self.connect_timeout_ms,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_base_url("venues.derive.base_url", &self.base_url)?;
        self.http().validate(
            "venues.derive.timeout_ms",
            "venues.derive.connect_timeout_ms",
        )?;
        if let Some(period) = self.period {
            if !ALLOWED_PERIODS.contains(&period) {
                return Err(ConfigError::InvalidValue {
                    field: "venues.derive.period",
                    reason: format!("{period} is not one of {ALLOWED_PERIODS:?}"),
                });
            }
        }
        Ok(())
    }
}
