//! Canonical funding observations and per-venue series.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::{Instrument, Venue};

/// Basis points per unit of decimal fraction.
pub const BPS_PER_UNIT: Decimal = dec!(10000);

/// Convert a decimal fraction into basis points.
#[must_use]
pub fn to_bps(rate: Decimal) -> Decimal {
    rate * BPS_PER_UNIT
}

/// One venue's funding rate at one instant.
///
/// `rate` is a decimal fraction per settlement period (`0.0001` = 1 bps).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FundingObservation {
    pub venue: Venue,
    pub instrument: Instrument,
    pub timestamp: DateTime<Utc>,
    pub rate: Decimal,
}

impl FundingObservation {
    pub fn new(
        venue: Venue,
        instrument: impl Into<Instrument>,
        timestamp: DateTime<Utc>,
        rate: Decimal,
    ) -> Self {
        Self {
            venue,
            instrument: instrument.into(),
            timestamp,
            rate,
        }
    }

    /// Rate in basis points. Derived, never stored.
    #[must_use]
    pub fn rate_bps(&self) -> Decimal {
        to_bps(self.rate)
    }

    #[must_use]
    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }
}

/// Ordered funding observations for one venue and instrument.
///
/// Built fresh per fetch and immutable afterwards. Timestamps are
/// non-decreasing and unique; `dropped` counts malformed upstream rows that
/// were skipped while building the series, and `raw_rows` counts every row
/// the venue sent, repeated timestamps included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueSeries {
    venue: Venue,
    instrument: Instrument,
    observations: Vec<FundingObservation>,
    dropped: usize,
    #[serde(skip)]
    raw_rows: usize,
}

impl VenueSeries {
    /// Build a series, sorting by time and keeping the first observation
    /// seen for any repeated timestamp.
    pub fn new(
        venue: Venue,
        instrument: impl Into<Instrument>,
        mut observations: Vec<FundingObservation>,
        dropped: usize,
    ) -> Self {
        let raw_rows = observations.len() + dropped;
        // sort_by_key is stable: the first occurrence of a timestamp stays first.
        observations.sort_by_key(|o| o.timestamp);
        observations.dedup_by_key(|o| o.timestamp);
        Self {
            venue,
            instrument: instrument.into(),
            observations,
            dropped,
            raw_rows,
        }
    }

    /// Empty, validly typed series.
    pub fn empty(venue: Venue, instrument: impl Into<Instrument>) -> Self {
        Self::new(venue, instrument, Vec::new(), 0)
    }

    #[must_use]
    pub const fn venue(&self) -> Venue {
        self.venue
    }

    #[must_use]
    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    #[must_use]
    pub fn observations(&self) -> &[FundingObservation] {
        &self.observations
    }

    #[must_use]
    pub fn into_observations(self) -> Vec<FundingObservation> {
        self.observations
    }

    /// Number of malformed rows skipped upstream.
    #[must_use]
    pub const fn dropped(&self) -> usize {
        self.dropped
    }

    /// Rows received upstream, before dropping or de-duplicating.
    #[must_use]
    pub const fn raw_rows(&self) -> usize {
        self.raw_rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&FundingObservation> {
        self.observations.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&FundingObservation> {
        self.observations.last()
    }
}
