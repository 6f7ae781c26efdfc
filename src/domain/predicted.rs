//! Predicted next-settlement funding, as published by aggregating venues.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::observation::to_bps;

/// Predicted funding for one asset on one (possibly external) venue.
///
/// `venue` is kept as the publisher's own label (`HlPerp`, `BinPerp`,
/// `BybitPerp`) since it may name venues this crate does not fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictedFunding {
    pub asset: String,
    pub venue: String,
    pub rate: Decimal,
    pub next_funding_time: DateTime<Utc>,
}

impl PredictedFunding {
    #[must_use]
    pub fn rate_bps(&self) -> Decimal {
        to_bps(self.rate)
    }
}
