//! Per-venue adapter settings.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::adapter::outbound::binance::BinanceSettings;
use crate::adapter::outbound::derive::DeriveSettings;
use crate::adapter::outbound::hyperliquid::HyperliquidSettings;
use crate::application::FillPolicy;
use crate::domain::Venue;
use crate::error::ConfigError;

/// `[venues.*]`. A missing table means the venue runs with defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VenuesConfig {
    #[serde(default)]
    pub hyperliquid: HyperliquidSettings,
    #[serde(default)]
    pub derive: DeriveSettings,
    #[serde(default)]
    pub binance: BinanceSettings,
}

impl VenuesConfig {
    #[must_use]
    pub fn is_enabled(&self, venue: Venue) -> bool {
        match venue {
            Venue::Hyperliquid => self.hyperliquid.enabled,
            Venue::Derive => self.derive.enabled,
            Venue::Binance => self.binance.enabled,
        }
    }

    /// Enabled venues in column order.
    #[must_use]
    pub fn enabled(&self) -> Vec<Venue> {
        Venue::ALL
            .into_iter()
            .filter(|venue| self.is_enabled(*venue))
            .collect()
    }

    /// Fill policies that differ from automatic classification.
    #[must_use]
    pub fn fill_policies(&self) -> BTreeMap<Venue, FillPolicy> {
        [
            (Venue::Hyperliquid, self.hyperliquid.fill),
            (Venue::Derive, self.derive.fill),
            (Venue::Binance, self.binance.fill),
        ]
        .into_iter()
        .filter(|(_, policy)| *policy != FillPolicy::Auto)
        .collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "venues",
                reason: "at least one venue must be enabled".into(),
            });
        }
        if self.hyperliquid.enabled {
            self.hyperliquid.validate()?;
        }
        if self.derive.enabled {
            self.derive.validate()?;
        }
        if self.binance.enabled {
            self.binance.validate()?;
        }
        Ok(())
    }
}
