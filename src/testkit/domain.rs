//! Builders for domain primitives used across tests.
//!
//! Time helpers anchor at the Unix epoch so hour `h` is `h * 3_600_000` ms,
//! which keeps grid arithmetic in assertions easy to read.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::domain::{FundingObservation, Instrument, TimeRange, Venue, VenueSeries};

const HOUR_MS: i64 = 3_600_000;

/// Default BTC instrument symbol for a venue.
pub fn instrument(venue: Venue) -> Instrument {
    match venue {
        Venue::Hyperliquid => Instrument::new("BTC"),
        Venue::Derive => Instrument::new("BTC-PERP"),
        Venue::Binance => Instrument::new("BTCUSDT"),
    }
}

/// Instant `ms` milliseconds after the epoch.
pub fn at_ms(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .expect("test timestamp should be representable")
}

/// Instant `hour` hours after the epoch.
pub fn at_hour(hour: i64) -> DateTime<Utc> {
    at_ms(hour * HOUR_MS)
}

/// Observation at `ms` epoch milliseconds.
pub fn obs_ms(venue: Venue, ms: i64, rate: Decimal) -> FundingObservation {
    FundingObservation::new(venue, instrument(venue), at_ms(ms), rate)
}

/// Observation at the top of `hour`.
pub fn obs_hour(venue: Venue, hour: i64, rate: Decimal) -> FundingObservation {
    obs_ms(venue, hour * HOUR_MS, rate)
}

/// Hourly observations starting at hour 0, one per rate.
pub fn hourly(venue: Venue, rates: &[Decimal]) -> VenueSeries {
    let observations = rates
        .iter()
        .enumerate()
        .map(|(hour, rate)| obs_hour(venue, hour as i64, *rate))
        .collect();
    series(venue, observations)
}

/// Series with no dropped rows.
pub fn series(venue: Venue, observations: Vec<FundingObservation>) -> VenueSeries {
    VenueSeries::new(venue, instrument(venue), observations, 0)
}

/// Window from `start_hour` to `end_hour` after the epoch.
pub fn hours_range(start_hour: i64, end_hour: i64) -> TimeRange {
    TimeRange::for_venue(Venue::Binance, at_hour(start_hour), at_hour(end_hour))
        .expect("test range should be ordered")
}
