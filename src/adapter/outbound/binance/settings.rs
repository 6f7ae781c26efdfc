//! Binance venue configuration.

use serde::Deserialize;

use crate::adapter::outbound::http::{validate_base_url, HttpSettings};
use crate::application::FillPolicy;
use crate::error::ConfigError;

/// Largest page the funding endpoint serves.
pub const MAX_PAGE_LIMIT: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BinanceSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_page_limit")]
    pub page_limit: usize,
    #[serde(default)]
    pub fill: FillPolicy,
}

const fn default_enabled() -> bool {
    true
}

fn default_base_url() -> String {
    "https://fapi.binance.com".into()
}

const fn default_timeout_ms() -> u64 {
    5_000
}

const fn default_connect_timeout_ms() -> u64 {
    3_000
}

const fn default_page_limit() -> usize {
    MAX_PAGE_LIMIT
}

impl Default for BinanceSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            page_limit: default_page_limit(),
            fill: FillPolicy::default(),
        }
    }
}

impl BinanceSettings {
    #[must_use]
    pub const fn http(&self) -> HttpSettings {
        HttpSettings {
            timeout_ms: self.timeout_ms,
            connect_timeout_ms: self.connect_timeout_ms,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_base_url("venues.binance.base_url", &self.base_url)?;
        self.http().validate(
            "venues.binance.timeout_ms",
            "venues.binance.connect_timeout_ms",
        )?;
        if !(1..=MAX_PAGE_LIMIT).contains(&self.page_limit) {
            return Err(ConfigError::InvalidValue {
                field: "venues.binance.page_limit",
                reason: format!("must be between 1 and {MAX_PAGE_LIMIT}"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = BinanceSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.page_limit, 1000);
    }

    #[test]
    fn page_limit_is_bounded() {
        for limit in [0, 1001] {
            let settings = BinanceSettings {
                page_limit: limit,
                ..BinanceSettings::default()
            };
            assert!(matches!(
                settings.validate(),
                Err(ConfigError::InvalidValue {
                    field: "venues.binance.page_limit",
                    ..
                })
            ));
        }
    }
}
