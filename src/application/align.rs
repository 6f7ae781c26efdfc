//! Resampling of heterogeneous-frequency series onto one grid.
//!
//! Venues sampling at or faster than the grid step are averaged per cell
//! (`[t, t + freq)`); venues sampling slower are forward-filled, because a
//! rate set at settlement stays in effect until the next one supersedes it.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{AlignedFrame, Frequency, FundingObservation, Venue, VenueSeries};

/// How a venue's observations are mapped onto grid cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillPolicy {
    /// Classify by native cadence relative to the grid step.
    #[default]
    Auto,
    /// Arithmetic mean of the observations inside each cell.
    Mean,
    /// Most recent observation at or before each cell start.
    ForwardFill,
}

/// Native sampling cadence of a venue relative to the grid step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Observations arrive at least once per grid step.
    SubGrid,
    /// Observations arrive less often than the grid step.
    SuperGrid,
}

impl Cadence {
    /// Classify by the median gap between consecutive observations.
    ///
    /// A series with fewer than two observations has no measurable cadence
    /// and is treated as super-grid so its single rate stays in effect.
    #[must_use]
    pub fn classify(observations: &[FundingObservation], freq: Frequency) -> Self {
        let mut gaps: Vec<i64> = observations
            .windows(2)
            .map(|w| w[1].timestamp_ms() - w[0].timestamp_ms())
            .filter(|gap| *gap > 0)
            .collect();
        if gaps.is_empty() {
            return Self::SuperGrid;
        }
        gaps.sort_unstable();
        let median = gaps[gaps.len() / 2];
        if median <= freq.as_millis() {
            Self::SubGrid
        } else {
            Self::SuperGrid
        }
    }
}

/// Aligns per-venue series onto a shared grid of step `freq`.
#[derive(Debug, Clone)]
pub struct SeriesAligner {
    freq: Frequency,
    policies: BTreeMap<Venue, FillPolicy>,
}

impl SeriesAligner {
    #[must_use]
    pub fn new(freq: Frequency) -> Self {
        Self {
            freq,
            policies: BTreeMap::new(),
        }
    }

    /// Pin the fill policy for one venue instead of classifying it.
    #[must_use]
    pub fn with_policy(mut self, venue: Venue, policy: FillPolicy) -> Self {
        self.policies.insert(venue, policy);
        self
    }

    #[must_use]
    pub const fn freq(&self) -> Frequency {
        self.freq
    }

    /// Align every non-empty series onto one grid.
    ///
    /// The grid spans the union of all venue ranges (epoch-aligned cells).
    /// Fewer than two reporting venues yields an explicitly empty frame.
    #[must_use]
    pub fn align(&self, series_by_venue: &BTreeMap<Venue, VenueSeries>) -> AlignedFrame {
        let reporting: Vec<&VenueSeries> = series_by_venue
            .values()
            .filter(|series| !series.is_empty())
            .collect();

        match reporting.len() {
            0 => return AlignedFrame::no_data(self.freq),
            1 => return AlignedFrame::insufficient(self.freq, vec![reporting[0].venue()]),
            _ => {}
        }

        let step = self.freq.as_millis();
        let grid_start = reporting
            .iter()
            .filter_map(|s| s.first())
            .map(|o| self.freq.floor_millis(o.timestamp_ms()))
            .min();
        let grid_end = reporting
            .iter()
            .filter_map(|s| s.last())
            .map(|o| self.freq.floor_millis(o.timestamp_ms()))
            .max();
        let (Some(grid_start), Some(grid_end)) = (grid_start, grid_end) else {
            return AlignedFrame::no_data(self.freq);
        };

        let cells = usize::try_from((grid_end - grid_start) / step + 1).unwrap_or(0);
        let grid: Vec<i64> = (0..cells)
            .map(|k| grid_start + step * k as i64)
            .collect();
        let times: Vec<DateTime<Utc>> = grid
            .iter()
            .filter_map(|ms| Utc.timestamp_millis_opt(*ms).single())
            .collect();

        let mut columns = BTreeMap::new();
        for series in reporting {
            let venue = series.venue();
            let policy = self.policies.get(&venue).copied().unwrap_or_default();
            let fill = match policy {
                FillPolicy::Mean => Cadence::SubGrid,
                FillPolicy::ForwardFill => Cadence::SuperGrid,
                FillPolicy::Auto => Cadence::classify(series.observations(), self.freq),
            };
            debug!(venue = %venue, ?policy, ?fill, rows = series.len(), "Aligning series");

            let column = match fill {
                Cadence::SubGrid => mean_per_cell(series.observations(), grid_start, step, cells),
                Cadence::SuperGrid => forward_fill(series.observations(), &grid),
            };
            columns.insert(venue, column);
        }

        AlignedFrame::new(self.freq, times, columns)
    }
}

/// Free-function form of [`SeriesAligner::align`] with automatic fill policies.
#[must_use]
pub fn align(series_by_venue: &BTreeMap<Venue, VenueSeries>, freq: Frequency) -> AlignedFrame {
    SeriesAligner::new(freq).align(series_by_venue)
}

fn mean_per_cell(
    observations: &[FundingObservation],
    grid_start: i64,
    step: i64,
    cells: usize,
) -> Vec<Option<Decimal>> {
    let mut sums = vec![Decimal::ZERO; cells];
    let mut counts = vec![0u32; cells];

    for obs in observations {
        let offset = obs.timestamp_ms() - grid_start;
        if offset < 0 {
            continue;
        }
        let Ok(index) = usize::try_from(offset / step) else {
            continue;
        };
        if index < cells {
            sums[index] += obs.rate;
            counts[index] += 1;
        }
    }

    sums.into_iter()
        .zip(counts)
        .map(|(sum, count)| (count > 0).then(|| sum / Decimal::from(count)))
        .collect()
}

fn forward_fill(observations: &[FundingObservation], grid: &[i64]) -> Vec<Option<Decimal>> {
    let mut column = Vec::with_capacity(grid.len());
    let mut next = 0;
    let mut current = None;

    for cell in grid {
        while next < observations.len() && observations[next].timestamp_ms() <= *cell {
            current = Some(observations[next].rate);
            next += 1;
        }
        column.push(current);
    }
    column
}
