//! Text rendering for funding snapshots.
//!
//! Pure formatting: every function returns a string so handlers stay thin
//! and the layouts can be tested without capturing stdout.

use rust_decimal::Decimal;
use tabled::builder::Builder;
use tabled::{Table, Tabled};

use crate::application::{Annualization, Snapshot, VenueCoverage};
use crate::domain::{AlignedFrame, PairStats, PredictedFunding, SpreadPoint, Venue, VenueStats};

const MISSING: &str = "-";

fn fixed(value: Decimal, places: usize) -> String {
    format!("{value:.places$}")
}

fn bps(value: Decimal) -> String {
    fixed(value, 2)
}

/// One-word status plus detail for a venue's part in a refresh.
#[must_use]
pub fn coverage_label(coverage: &VenueCoverage) -> String {
    match coverage {
        VenueCoverage::Reported {
            observations,
            dropped: 0,
        } => format!("ok ({observations} observations)"),
        VenueCoverage::Reported {
            observations,
            dropped,
        } => format!("ok ({observations} observations, {dropped} malformed dropped)"),
        VenueCoverage::Empty { .. } => "no data in window".to_string(),
        VenueCoverage::Failed { reason } => format!("failed: {reason}"),
        VenueCoverage::TimedOut { deadline_ms } => format!("timed out after {deadline_ms}ms"),
        VenueCoverage::Unmapped => "no instrument configured".to_string(),
    }
}

#[derive(Tabled)]
struct VenueStatsRow {
    #[tabled(rename = "Venue")]
    venue: &'static str,
    #[tabled(rename = "Samples")]
    samples: usize,
    #[tabled(rename = "Mean (bps)")]
    mean: String,
    #[tabled(rename = "Std (bps)")]
    std: String,
}

#[must_use]
pub fn venue_stats_table(stats: &[VenueStats]) -> String {
    let rows = stats.iter().map(|s| VenueStatsRow {
        venue: s.venue.label(),
        samples: s.samples,
        mean: bps(s.mean_bps),
        std: s.std_bps.map_or_else(|| MISSING.to_string(), bps),
    });
    Table::new(rows).to_string()
}

#[derive(Tabled)]
struct PairStatsRow {
    #[tabled(rename = "Pair")]
    pair: String,
    #[tabled(rename = "Rows")]
    rows: usize,
    #[tabled(rename = "Mean A")]
    mean_a: String,
    #[tabled(rename = "Mean B")]
    mean_b: String,
    #[tabled(rename = "Mean Spread")]
    mean_spread: String,
    #[tabled(rename = "Max")]
    max: String,
    #[tabled(rename = "Min")]
    min: String,
    #[tabled(rename = "A > B")]
    positive: String,
}

/// Head-to-head table, spreads in bps.
#[must_use]
pub fn pair_stats_table(stats: &[PairStats]) -> String {
    let rows = stats.iter().map(|s| PairStatsRow {
        pair: format!("{} / {}", s.a.label(), s.b.label()),
        rows: s.rows,
        mean_a: bps(s.mean_a_bps),
        mean_b: bps(s.mean_b_bps),
        mean_spread: bps(s.mean_spread_bps),
        max: bps(s.max_spread_bps),
        min: bps(s.min_spread_bps),
        positive: format!("{}%", fixed(s.positive_share_pct, 1)),
    });
    Table::new(rows).to_string()
}

/// Ranked spread rows for the pair `a` / `b`.
#[must_use]
pub fn top_spreads_table(points: &[SpreadPoint], a: Venue, b: Venue) -> String {
    let mut builder = Builder::default();
    builder.push_record([
        "Time (UTC)".to_string(),
        format!("{} (bps)", a.label()),
        format!("{} (bps)", b.label()),
        "Spread (bps)".to_string(),
    ]);
    for point in points {
        builder.push_record([
            point.time.format("%Y-%m-%d %H:%M").to_string(),
            bps(point.a_bps),
            bps(point.b_bps),
            bps(point.spread_bps),
        ]);
    }
    builder.build().to_string()
}

/// The newest `last` rows of the frame, one column per venue and spread.
#[must_use]
pub fn frame_table(frame: &AlignedFrame, last: usize) -> String {
    let venues = frame.venues();
    let pairs = frame.spread_pairs();

    let mut header = vec!["Time (UTC)".to_string()];
    header.extend(venues.iter().map(|v| v.as_str().to_string()));
    header.extend(pairs.iter().map(|(a, b)| crate::domain::spread_name(*a, *b)));

    let mut builder = Builder::default();
    builder.push_record(header);

    let start = frame.len().saturating_sub(last);
    for index in start..frame.len() {
        let mut record = vec![frame.times()[index].format("%Y-%m-%d %H:%M").to_string()];
        record.extend(
            venues
                .iter()
                .map(|v| frame.rate_bps(*v, index).map_or_else(|| MISSING.to_string(), bps)),
        );
        record.extend(pairs.iter().map(|(a, b)| {
            frame
                .spread_bps(*a, *b, index)
                .map_or_else(|| MISSING.to_string(), bps)
        }));
        builder.push_record(record);
    }
    builder.build().to_string()
}

#[derive(Tabled)]
struct PredictedRow {
    #[tabled(rename = "Asset")]
    asset: String,
    #[tabled(rename = "Venue")]
    venue: String,
    #[tabled(rename = "Rate (bps)")]
    rate: String,
    #[tabled(rename = "APY")]
    apy: String,
    #[tabled(rename = "Next Funding (UTC)")]
    next: String,
}

/// Predicted rates with an APY at the default settlement cadence.
#[must_use]
pub fn predicted_table(entries: &[PredictedFunding], annualization: &Annualization) -> String {
    let rows = entries.iter().map(|p| PredictedRow {
        asset: p.asset.clone(),
        venue: p.venue.clone(),
        rate: fixed(p.rate_bps(), 4),
        apy: format!("{}%", fixed(annualization.annualize_default(p.rate), 2)),
        next: p.next_funding_time.format("%Y-%m-%d %H:%M").to_string(),
    });
    Table::new(rows).to_string()
}

/// Single status line for one watch cycle.
#[must_use]
pub fn watch_line(snapshot: &Snapshot) -> String {
    let pair = snapshot.best_pair.as_ref().map_or_else(
        || "no pair with two current rates".to_string(),
        |pair| {
            format!(
                "long {} short {} {} bps ({}% APY)",
                pair.long_venue,
                pair.short_venue,
                bps(pair.spread_bps()),
                fixed(pair.annualized_yield, 2)
            )
        },
    );

    let summary = &snapshot.summary;
    let mut line = format!(
        "{} {pair} | {}/{} rows >= {}%",
        snapshot.asset, summary.opportunities_found, summary.rows_considered, snapshot.threshold_pct
    );

    let missing: Vec<&str> = snapshot
        .coverage
        .iter()
        .filter(|(_, coverage)| !coverage.is_reported())
        .map(|(venue, _)| venue.as_str())
        .collect();
    if !missing.is_empty() {
        line.push_str(&format!(" | missing: {}", missing.join(", ")));
    }
    line
}
