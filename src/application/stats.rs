//! Opportunity counting and descriptive statistics over an aligned frame.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use crate::domain::{AlignedFrame, OpportunitySummary, PairStats, SpreadPoint, Venue, VenueStats};

const PERCENT: Decimal = dec!(100);

/// Count rows whose cross-venue spread clears `threshold_pct`.
///
/// A row qualifies when at least two venues are present; its spread is
/// `max - min` of the present rates, in percent. Average and maximum run over
/// every qualifying row, threshold or not. No qualifying row yields zeros.
#[must_use]
pub fn summarize(frame: &AlignedFrame, threshold_pct: Decimal) -> OpportunitySummary {
    let spreads: Vec<Decimal> = frame
        .rows()
        .filter_map(|row| row.spread_range())
        .map(|spread| spread * PERCENT)
        .collect();

    let Some(max_spread_pct) = spreads.iter().copied().max() else {
        return OpportunitySummary::default();
    };

    let total: Decimal = spreads.iter().copied().sum();
    OpportunitySummary {
        opportunities_found: spreads.iter().filter(|s| **s >= threshold_pct).count(),
        avg_spread_pct: total / Decimal::from(spreads.len()),
        max_spread_pct,
        rows_considered: spreads.len(),
    }
}

/// Mean and sample standard deviation of each venue's present cells, in bps.
#[must_use]
pub fn venue_stats(frame: &AlignedFrame) -> Vec<VenueStats> {
    frame
        .venues()
        .into_iter()
        .map(|venue| {
            let values: Vec<Decimal> = (0..frame.len())
                .filter_map(|index| frame.rate_bps(venue, index))
                .collect();
            VenueStats {
                venue,
                samples: values.len(),
                mean_bps: mean(&values).unwrap_or_default(),
                std_bps: sample_std(&values),
            }
        })
        .collect()
}

/// Head-to-head statistics over rows where both `a` and `b` are present.
#[must_use]
pub fn pair_stats(frame: &AlignedFrame, a: Venue, b: Venue) -> Option<PairStats> {
    let overlap: Vec<(Decimal, Decimal)> = (0..frame.len())
        .filter_map(|index| Some((frame.rate_bps(a, index)?, frame.rate_bps(b, index)?)))
        .collect();
    if overlap.is_empty() {
        return None;
    }

    let a_values: Vec<Decimal> = overlap.iter().map(|(x, _)| *x).collect();
    let b_values: Vec<Decimal> = overlap.iter().map(|(_, y)| *y).collect();
    let spreads: Vec<Decimal> = overlap.iter().map(|(x, y)| x - y).collect();
    let positive = spreads.iter().filter(|s| **s > Decimal::ZERO).count();
    let rows = Decimal::from(overlap.len());

    Some(PairStats {
        a,
        b,
        rows: overlap.len(),
        mean_a_bps: mean(&a_values)?,
        mean_b_bps: mean(&b_values)?,
        mean_spread_bps: mean(&spreads)?,
        max_spread_bps: spreads.iter().copied().max()?,
        min_spread_bps: spreads.iter().copied().min()?,
        positive_share_pct: Decimal::from(positive) / rows * PERCENT,
    })
}

/// The `n` rows with the largest absolute `a - b` spread.
///
/// Ordered by absolute spread descending, then by time ascending.
#[must_use]
pub fn top_spreads(frame: &AlignedFrame, a: Venue, b: Venue, n: usize) -> Vec<SpreadPoint> {
    let mut points: Vec<SpreadPoint> = (0..frame.len())
        .filter_map(|index| {
            let a_bps = frame.rate_bps(a, index)?;
            let b_bps = frame.rate_bps(b, index)?;
            Some(SpreadPoint {
                time: frame.times()[index],
                a_bps,
                b_bps,
                spread_bps: a_bps - b_bps,
            })
        })
        .collect();

    points.sort_by(|x, y| {
        y.spread_bps
            .abs()
            .cmp(&x.spread_bps.abs())
            .then_with(|| x.time.cmp(&y.time))
    });
    points.truncate(n);
    points
}

fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let total: Decimal = values.iter().copied().sum();
    Some(total / Decimal::from(values.len()))
}

fn sample_std(values: &[Decimal]) -> Option<Decimal> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let squares: Decimal = values.iter().map(|v| (*v - mean) * (*v - mean)).sum();
    (squares / Decimal::from(values.len() - 1)).sqrt()
}
