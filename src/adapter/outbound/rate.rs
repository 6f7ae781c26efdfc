//! Lenient numeric fields shared by venue DTOs.
//!
//! Venues send rates as JSON strings (`"0.0001"`, `"1.25e-5"`) or bare
//! numbers, and timestamps as integers or integer strings. Anything that does
//! not parse to a finite decimal is reported as `None` so the row can be
//! dropped. Funding rates are also bounded by [`MAX_ABS_RATE`].

use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

/// Largest accepted funding rate magnitude per settlement (100%).
pub const MAX_ABS_RATE: Decimal = dec!(1);

/// A JSON scalar that should hold a number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(serde_json::Number),
    Text(String),
}

impl RawNumber {
    /// Finite decimal value, plain or scientific notation.
    #[must_use]
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Number(number) => parse_decimal(&number.to_string()),
            Self::Text(text) => parse_decimal(text),
        }
    }

    /// Funding rate as a decimal fraction, rejecting magnitudes above
    /// [`MAX_ABS_RATE`].
    #[must_use]
    pub fn to_rate(&self) -> Option<Decimal> {
        self.to_decimal().filter(|rate| rate.abs() <= MAX_ABS_RATE)
    }

    /// Epoch-millisecond timestamp.
    #[must_use]
    pub fn to_millis(&self) -> Option<DateTime<Utc>> {
        let millis = match self {
            Self::Number(number) => number.as_i64()?,
            Self::Text(text) => text.trim().parse::<i64>().ok()?,
        };
        Utc.timestamp_millis_opt(millis).single()
    }
}

fn parse_decimal(input: &str) -> Option<Decimal> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    Decimal::from_str(input)
        .or_else(|_| Decimal::from_scientific(input))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawNumber {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn parses_strings_and_numbers() {
        assert_eq!(raw(json!("0.00012500")).to_decimal(), Some(dec!(0.000125)));
        assert_eq!(raw(json!("-0.0001")).to_decimal(), Some(dec!(-0.0001)));
        assert_eq!(raw(json!("1.25e-5")).to_decimal(), Some(dec!(0.0000125)));
        assert_eq!(raw(json!(0.0003)).to_decimal(), Some(dec!(0.0003)));
        assert_eq!(raw(json!(2)).to_decimal(), Some(dec!(2)));
    }

    #[test]
    fn rejects_non_finite_and_garbage() {
        assert_eq!(raw(json!("NaN")).to_decimal(), None);
        assert_eq!(raw(json!("inf")).to_decimal(), None);
        assert_eq!(raw(json!("")).to_decimal(), None);
        assert_eq!(raw(json!("abc")).to_decimal(), None);
    }

    #[test]
    fn rates_beyond_one_are_rejected() {
        assert_eq!(raw(json!("1")).to_rate(), Some(dec!(1)));
        assert_eq!(raw(json!("-0.75")).to_rate(), Some(dec!(-0.75)));
        assert_eq!(raw(json!("1.0001")).to_rate(), None);
        assert_eq!(raw(json!("1e27")).to_rate(), None);
        assert_eq!(raw(json!(-3)).to_rate(), None);
        assert!(raw(json!("1e27")).to_decimal().is_some());
    }

    #[test]
    fn parses_millisecond_timestamps() {
        let expected = Utc.timestamp_millis_opt(1_700_000_000_000).single();
        assert_eq!(raw(json!(1_700_000_000_000_i64)).to_millis(), expected);
        assert_eq!(raw(json!("1700000000000")).to_millis(), expected);
        assert_eq!(raw(json!(1.5)).to_millis(), None);
        assert_eq!(raw(json!("soon")).to_millis(), None);
    }

    #[test]
    fn non_scalars_do_not_deserialize() {
        assert!(serde_json::from_value::<RawNumber>(json!({"v": 1})).is_err());
        assert!(serde_json::from_value::<RawNumber>(json!(null)).is_err());
    }
}
