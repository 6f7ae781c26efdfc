//! Best long/short venue pair at one instant.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::observation::to_bps;
use super::Venue;

/// Highest-rate venue takes the long slot, lowest-rate venue the short slot.
///
/// The slots are a ranking convention only: the venue with the numerically
/// highest rate is `long_venue` and the lowest is `short_venue`, regardless
/// of which side actually receives funding on either venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BestPair {
    pub long_venue: Venue,
    pub short_venue: Venue,
    /// `rate(long) - rate(short)`, decimal fraction, never negative.
    pub spread: Decimal,
    /// Projected annual yield in percent.
    pub annualized_yield: Decimal,
    /// Every venue rate the ranking saw.
    pub rates: BTreeMap<Venue, Decimal>,
}

impl BestPair {
    #[must_use]
    pub fn spread_bps(&self) -> Decimal {
        to_bps(self.spread)
    }

    #[must_use]
    pub fn long_rate(&self) -> Option<Decimal> {
        self.rates.get(&self.long_venue).copied()
    }

    #[must_use]
    pub fn short_rate(&self) -> Option<Decimal> {
        self.rates.get(&self.short_venue).copied()
    }
}
