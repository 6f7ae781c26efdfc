//! Multi-venue funding rates aligned on one evenly spaced grid.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use super::observation::to_bps;
use super::{Frequency, Venue};

/// Why an aligned frame carries no rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FrameGap {
    /// No venue produced a single observation.
    NoData,
    /// Only these venues produced data; spreads need at least two.
    InsufficientVenues { venues: Vec<Venue> },
}

/// One pairwise spread cell, `rate_a_bps - rate_b_bps`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpreadCell {
    pub a: Venue,
    pub b: Venue,
    pub bps: Option<Decimal>,
}

impl SpreadCell {
    /// Column name, e.g. `hyperliquid_binance`.
    #[must_use]
    pub fn name(&self) -> String {
        spread_name(self.a, self.b)
    }
}

/// Column name for the spread between `a` and `b`.
#[must_use]
pub fn spread_name(a: Venue, b: Venue) -> String {
    format!("{a}_{b}")
}

/// One timestamp of an aligned frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameRow {
    pub time: DateTime<Utc>,
    /// Rate per venue column; `None` when nothing covers this instant.
    pub rates: BTreeMap<Venue, Option<Decimal>>,
    pub spreads: Vec<SpreadCell>,
}

impl FrameRow {
    /// Venues with a value at this row, in column order.
    #[must_use]
    pub fn present(&self) -> Vec<(Venue, Decimal)> {
        self.rates
            .iter()
            .filter_map(|(venue, rate)| rate.map(|r| (*venue, r)))
            .collect()
    }

    #[must_use]
    pub fn present_count(&self) -> usize {
        self.rates.values().filter(|r| r.is_some()).count()
    }

    /// Whether every venue column has a value.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.rates.is_empty() && self.rates.values().all(Option::is_some)
    }

    /// `max - min` over present rates, when at least two are present.
    #[must_use]
    pub fn spread_range(&self) -> Option<Decimal> {
        let present = self.present();
        if present.len() < 2 {
            return None;
        }
        let max = present.iter().map(|(_, r)| *r).max()?;
        let min = present.iter().map(|(_, r)| *r).min()?;
        Some(max - min)
    }
}

/// Aligned funding rates: a strictly increasing grid at step `freq` with one
/// optional column per venue.
///
/// An empty frame always carries a [`FrameGap`] explaining why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedFrame {
    freq: Frequency,
    times: Vec<DateTime<Utc>>,
    columns: BTreeMap<Venue, Vec<Option<Decimal>>>,
    gap: Option<FrameGap>,
}

impl AlignedFrame {
    /// Build a frame from a grid and per-venue columns. Columns shorter than
    /// the grid are padded with absent cells, longer ones are truncated.
    pub fn new(
        freq: Frequency,
        times: Vec<DateTime<Utc>>,
        mut columns: BTreeMap<Venue, Vec<Option<Decimal>>>,
    ) -> Self {
        for column in columns.values_mut() {
            column.resize(times.len(), None);
        }
        let gap = if times.is_empty() || columns.is_empty() {
            Some(FrameGap::NoData)
        } else {
            None
        };
        Self {
            freq,
            times,
            columns,
            gap,
        }
    }

    /// Explicitly empty frame: nobody reported.
    #[must_use]
    pub fn no_data(freq: Frequency) -> Self {
        Self {
            freq,
            times: Vec::new(),
            columns: BTreeMap::new(),
            gap: Some(FrameGap::NoData),
        }
    }

    /// Explicitly empty frame: fewer than two venues reported.
    #[must_use]
    pub fn insufficient(freq: Frequency, venues: Vec<Venue>) -> Self {
        Self {
            freq,
            times: Vec::new(),
            columns: BTreeMap::new(),
            gap: Some(FrameGap::InsufficientVenues { venues }),
        }
    }

    #[must_use]
    pub const fn freq(&self) -> Frequency {
        self.freq
    }

    #[must_use]
    pub fn times(&self) -> &[DateTime<Utc>] {
        &self.times
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Reason the frame is empty, if it is.
    #[must_use]
    pub fn gap(&self) -> Option<&FrameGap> {
        self.gap.as_ref()
    }

    /// Venue columns in column order.
    #[must_use]
    pub fn venues(&self) -> Vec<Venue> {
        self.columns.keys().copied().collect()
    }

    #[must_use]
    pub fn column(&self, venue: Venue) -> Option<&[Option<Decimal>]> {
        self.columns.get(&venue).map(Vec::as_slice)
    }

    #[must_use]
    pub fn rate(&self, venue: Venue, index: usize) -> Option<Decimal> {
        self.columns.get(&venue)?.get(index).copied().flatten()
    }

    #[must_use]
    pub fn rate_bps(&self, venue: Venue, index: usize) -> Option<Decimal> {
        self.rate(venue, index).map(to_bps)
    }

    /// Every unordered venue pair, in column order.
    #[must_use]
    pub fn spread_pairs(&self) -> Vec<(Venue, Venue)> {
        let venues = self.venues();
        let mut pairs = Vec::new();
        for (i, a) in venues.iter().enumerate() {
            for b in &venues[i + 1..] {
                pairs.push((*a, *b));
            }
        }
        pairs
    }

    /// `rate_a_bps - rate_b_bps`, present only when both inputs are.
    #[must_use]
    pub fn spread_bps(&self, a: Venue, b: Venue, index: usize) -> Option<Decimal> {
        Some(self.rate_bps(a, index)? - self.rate_bps(b, index)?)
    }

    #[must_use]
    pub fn row(&self, index: usize) -> Option<FrameRow> {
        let time = *self.times.get(index)?;
        let rates = self
            .columns
            .iter()
            .map(|(venue, column)| (*venue, column.get(index).copied().flatten()))
            .collect();
        let spreads = self
            .spread_pairs()
            .into_iter()
            .map(|(a, b)| SpreadCell {
                a,
                b,
                bps: self.spread_bps(a, b, index),
            })
            .collect();
        Some(FrameRow {
            time,
            rates,
            spreads,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = FrameRow> + '_ {
        (0..self.len()).filter_map(|index| self.row(index))
    }

    /// Most recent row where every venue column has a value.
    #[must_use]
    pub fn latest_complete_row(&self) -> Option<FrameRow> {
        (0..self.len())
            .rev()
            .filter_map(|index| self.row(index))
            .find(FrameRow::is_complete)
    }
}

impl Serialize for AlignedFrame {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let rows: Vec<FrameRow> = self.rows().collect();
        let mut state = serializer.serialize_struct("AlignedFrame", 4)?;
        state.serialize_field("freq", &self.freq)?;
        state.serialize_field("venues", &self.venues())?;
        state.serialize_field("gap", &self.gap)?;
        state.serialize_field("rows", &rows)?;
        state.end()
    }
}
