//! Best long/short venue selection and yield projection.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::domain::{BestPair, FrameRow, Venue};
use crate::error::ConfigError;

const DAYS_PER_YEAR: Decimal = dec!(365);
const PERCENT: Decimal = dec!(100);
/// Once a minute.
const MAX_SETTLEMENTS_PER_DAY: Decimal = dec!(1440);

/// Settlements per day used to annualize each venue's rate.
///
/// Venues without an override use `default_settlements_per_day`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Annualization {
    #[serde(rename = "settlements_per_day", default = "default_settlements_per_day")]
    pub default_settlements_per_day: Decimal,
    #[serde(default)]
    pub per_venue: BTreeMap<Venue, Decimal>,
}

fn default_settlements_per_day() -> Decimal {
    dec!(3)
}

impl Default for Annualization {
    fn default() -> Self {
        Self::uniform(default_settlements_per_day())
    }
}

impl Annualization {
    /// Same cadence for every venue.
    #[must_use]
    pub fn uniform(settlements_per_day: Decimal) -> Self {
        Self {
            default_settlements_per_day: settlements_per_day,
            per_venue: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_venue(mut self, venue: Venue, settlements_per_day: Decimal) -> Self {
        self.per_venue.insert(venue, settlements_per_day);
        self
    }

    #[must_use]
    pub fn settlements_per_day(&self, venue: Venue) -> Decimal {
        self.per_venue
            .get(&venue)
            .copied()
            .unwrap_or(self.default_settlements_per_day)
    }

    /// Annual percentage for a single rate held on `venue`.
    #[must_use]
    pub fn annualize(&self, venue: Venue, rate: Decimal) -> Decimal {
        rate * self.settlements_per_day(venue) * DAYS_PER_YEAR * PERCENT
    }

    /// Annual percentage at the default cadence, for rates quoted by
    /// venues outside [`Venue`].
    #[must_use]
    pub fn annualize_default(&self, rate: Decimal) -> Decimal {
        rate * self.default_settlements_per_day * DAYS_PER_YEAR * PERCENT
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !in_settlement_range(self.default_settlements_per_day) {
            return Err(ConfigError::InvalidValue {
                field: "annualization.settlements_per_day",
                reason: format!("must be greater than 0 and at most {MAX_SETTLEMENTS_PER_DAY}"),
            });
        }
        if let Some((venue, _)) = self.per_venue.iter().find(|(_, n)| !in_settlement_range(**n)) {
            return Err(ConfigError::InvalidValue {
                field: "annualization.per_venue",
                reason: format!("{venue} must be greater than 0 and at most {MAX_SETTLEMENTS_PER_DAY}"),
            });
        }
        Ok(())
    }
}

fn in_settlement_range(settlements_per_day: Decimal) -> bool {
    settlements_per_day > Decimal::ZERO && settlements_per_day <= MAX_SETTLEMENTS_PER_DAY
}

/// Picks the best long/short pair from simultaneous venue rates.
///
/// Highest rate wins long slot, lowest rate wins short slot. The slots are a
/// ranking convention independent of which side receives funding. Ties on
/// either slot go to the venue whose name sorts first.
#[derive(Debug, Clone, Default)]
pub struct SpreadRanker {
    annualization: Annualization,
}

impl SpreadRanker {
    #[must_use]
    pub fn new(annualization: Annualization) -> Self {
        Self { annualization }
    }

    #[must_use]
    pub fn annualization(&self) -> &Annualization {
        &self.annualization
    }

    /// Best pair for `rates`, or `None` when fewer than two venues reported.
    ///
    /// The yield annualizes each leg at its own venue's settlement cadence:
    /// `(rate_long * n_long - rate_short * n_short) * 365 * 100`. With a
    /// uniform cadence `n` this is `spread * n * 365 * 100`.
    #[must_use]
    pub fn best_pair(&self, rates: &BTreeMap<Venue, Decimal>) -> Option<BestPair> {
        if rates.len() < 2 {
            return None;
        }

        let mut by_name: Vec<(Venue, Decimal)> = rates.iter().map(|(v, r)| (*v, *r)).collect();
        by_name.sort_by_key(|(venue, _)| venue.as_str());

        // First venue by name wins among equal rates.
        let (long_venue, long_rate) = by_name
            .iter()
            .copied()
            .reduce(|best, next| if next.1 > best.1 { next } else { best })?;
        let (short_venue, short_rate) = by_name
            .iter()
            .copied()
            .filter(|(venue, _)| *venue != long_venue)
            .reduce(|best, next| if next.1 < best.1 { next } else { best })?;

        let annualized_yield = self.annualization.annualize(long_venue, long_rate)
            - self.annualization.annualize(short_venue, short_rate);

        Some(BestPair {
            long_venue,
            short_venue,
            spread: long_rate - short_rate,
            annualized_yield,
            rates: rates.clone(),
        })
    }

    /// Best pair at one aligned row, using only the venues present there.
    #[must_use]
    pub fn best_pair_at(&self, row: &FrameRow) -> Option<BestPair> {
        let rates: BTreeMap<Venue, Decimal> = row.present().into_iter().collect();
        self.best_pair(&rates)
    }
}

/// Free-function form of [`SpreadRanker::best_pair`] at 3 settlements per day.
#[must_use]
pub fn best_pair(rates: &BTreeMap<Venue, Decimal>) -> Option<BestPair> {
    SpreadRanker::default().best_pair(rates)
}
