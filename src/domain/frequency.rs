//! Resample step for the shared time grid.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Fixed grid step, in milliseconds. Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Frequency(i64);

impl Frequency {
    /// Build a frequency from a millisecond step.
    pub fn new(millis: i64) -> Result<Self, DomainError> {
        if millis <= 0 {
            return Err(DomainError::NonPositiveFrequency { millis });
        }
        Ok(Self(millis))
    }

    /// Build a frequency from whole hours.
    pub fn hours(hours: i64) -> Result<Self, DomainError> {
        Self::new(hours.saturating_mul(HOUR_MS))
    }

    /// Parse `30m`, `1h`, `4h`, `8h`, `1d`, `900s` style steps.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let text = input.trim().to_ascii_lowercase();
        let split = text
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| DomainError::InvalidFrequency {
                input: input.to_string(),
                reason: "missing unit (s, m, h, d)",
            })?;
        let (digits, unit) = text.split_at(split);
        let count: i64 = digits.parse().map_err(|_| DomainError::InvalidFrequency {
            input: input.to_string(),
            reason: "missing count",
        })?;
        let unit_ms = match unit {
            "s" | "sec" | "secs" => 1_000,
            "m" | "min" | "mins" => MINUTE_MS,
            "h" | "hr" | "hrs" => HOUR_MS,
            "d" | "day" | "days" => DAY_MS,
            _ => {
                return Err(DomainError::InvalidFrequency {
                    input: input.to_string(),
                    reason: "unknown unit (use s, m, h, d)",
                })
            }
        };
        Self::new(count.saturating_mul(unit_ms))
    }

    /// Step in milliseconds.
    #[must_use]
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// Step as a chrono duration.
    #[must_use]
    pub fn as_duration(&self) -> Duration {
        Duration::milliseconds(self.0)
    }

    /// Start of the grid cell containing `ts_ms` (epoch-aligned).
    #[must_use]
    pub const fn floor_millis(&self, ts_ms: i64) -> i64 {
        ts_ms - ts_ms.rem_euclid(self.0)
    }

    /// Start of the grid cell containing `at`.
    #[must_use]
    pub fn floor(&self, at: DateTime<Utc>) -> DateTime<Utc> {
        let floored = self.floor_millis(at.timestamp_millis());
        Utc.timestamp_millis_opt(floored).single().unwrap_or(at)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.0;
        if ms % DAY_MS == 0 {
            write!(f, "{}d", ms / DAY_MS)
        } else if ms % HOUR_MS == 0 {
            write!(f, "{}h", ms / HOUR_MS)
        } else if ms % MINUTE_MS == 0 {
            write!(f, "{}m", ms / MINUTE_MS)
        } else if ms % 1_000 == 0 {
            write!(f, "{}s", ms / 1_000)
        } else {
            write!(f, "{ms}ms")
        }
    }
}

impl FromStr for Frequency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Frequency {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Frequency> for String {
    fn from(value: Frequency) -> Self {
        value.to_string()
    }
}
