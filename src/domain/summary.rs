//! Derived statistics over an aligned frame.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::Venue;

/// Threshold crossings over a lookback window. Percent values are
/// `spread * 100`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OpportunitySummary {
    /// Rows whose spread cleared the threshold.
    pub opportunities_found: usize,
    /// Mean spread over every row with at least two venues present.
    pub avg_spread_pct: Decimal,
    /// Largest spread over the same rows.
    pub max_spread_pct: Decimal,
    /// Rows with at least two venues present.
    pub rows_considered: usize,
}

/// Per-venue distribution of present cells, in basis points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueStats {
    pub venue: Venue,
    pub samples: usize,
    pub mean_bps: Decimal,
    /// Sample standard deviation; `None` below two samples.
    pub std_bps: Option<Decimal>,
}

/// Head-to-head statistics for one venue pair over overlapping rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairStats {
    pub a: Venue,
    pub b: Venue,
    pub rows: usize,
    pub mean_a_bps: Decimal,
    pub mean_b_bps: Decimal,
    /// Mean of `a - b`.
    pub mean_spread_bps: Decimal,
    pub max_spread_bps: Decimal,
    pub min_spread_bps: Decimal,
    /// Share of rows where `a - b > 0`, in percent.
    pub positive_share_pct: Decimal,
}

/// One row of a top-spread ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpreadPoint {
    pub time: DateTime<Utc>,
    pub a_bps: Decimal,
    pub b_bps: Decimal,
    pub spread_bps: Decimal,
}
