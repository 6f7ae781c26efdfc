//! Venue and instrument identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A trading venue publishing perpetual funding rates.
///
/// Declaration order is the column order of aligned frames and spread
/// names (`hyperliquid_derive`, `hyperliquid_binance`, `derive_binance`).
/// Ranking tie-breaks never use this order; they use [`Venue::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Venue {
    Hyperliquid,
    Derive,
    Binance,
}

impl Venue {
    /// Every supported venue, in column order.
    pub const ALL: [Venue; 3] = [Venue::Hyperliquid, Venue::Derive, Venue::Binance];

    /// Stable lowercase name used in config keys, logs and tie-breaks.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hyperliquid => "hyperliquid",
            Self::Derive => "derive",
            Self::Binance => "binance",
        }
    }

    /// Human-facing label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Hyperliquid => "Hyperliquid",
            Self::Derive => "Derive",
            Self::Binance => "Binance",
        }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Venue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hyperliquid" | "hl" => Ok(Self::Hyperliquid),
            "derive" | "deriv" | "lyra" => Ok(Self::Derive),
            "binance" => Ok(Self::Binance),
            other => Err(format!("unknown venue '{other}'")),
        }
    }
}

/// Venue-native instrument symbol (`BTCUSDT`, `BTC-PERP`, `BTC`).
///
/// The inner String is private to ensure all construction goes through
/// the defined constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Instrument(String);

impl Instrument {
    /// Create a new Instrument from a string.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    /// Get the symbol as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Instrument {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Instrument {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
