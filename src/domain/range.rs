//! Bounded retrieval windows.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::Venue;
use crate::error::FetchError;

/// Closed time window `[start, end]` with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    /// Validate a window on behalf of `venue`.
    pub fn for_venue(
        venue: Venue,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, FetchError> {
        if start > end {
            return Err(FetchError::InvalidRange {
                venue,
                start_ms: start.timestamp_millis(),
                end_ms: end.timestamp_millis(),
            });
        }
        Ok(Self { start, end })
    }

    /// Window of `lookback` ending at `now`, saturating at the earliest
    /// representable instant.
    #[must_use]
    pub fn trailing(now: DateTime<Utc>, lookback: Duration) -> Self {
        let start = now
            .checked_sub_signed(lookback.abs())
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self { start, end: now }
    }

    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Start in epoch milliseconds, clamped at zero for venue APIs.
    #[must_use]
    pub fn start_ms(&self) -> i64 {
        self.start.timestamp_millis().max(0)
    }

    /// End in epoch milliseconds.
    #[must_use]
    pub fn end_ms(&self) -> i64 {
        self.end.timestamp_millis().max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rejects_inverted_window() {
        let a = Utc.timestamp_millis_opt(2_000).unwrap();
        let b = Utc.timestamp_millis_opt(1_000).unwrap();
        let err = TimeRange::for_venue(Venue::Binance, a, b).unwrap_err();
        assert_eq!(
            err,
            FetchError::InvalidRange {
                venue: Venue::Binance,
                start_ms: 2_000,
                end_ms: 1_000
            }
        );
    }

    #[test]
    fn accepts_empty_window() {
        let a = Utc.timestamp_millis_opt(5_000).unwrap();
        let range = TimeRange::for_venue(Venue::Derive, a, a).unwrap();
        assert_eq!(range.start_ms(), range.end_ms());
    }

    #[test]
    fn clamps_pre_epoch_start() {
        let now = Utc.timestamp_millis_opt(1_000).unwrap();
        let range = TimeRange::trailing(now, Duration::days(1));
        assert_eq!(range.start_ms(), 0);
        assert_eq!(range.end_ms(), 1_000);
    }

    #[test]
    fn trailing_saturates_instead_of_overflowing() {
        let now = Utc.timestamp_millis_opt(1_000).unwrap();
        let range = TimeRange::trailing(now, Duration::days(4_000_000_000));
        assert_eq!(range.start(), DateTime::<Utc>::MIN_UTC);
        assert_eq!(range.start_ms(), 0);
    }
}
