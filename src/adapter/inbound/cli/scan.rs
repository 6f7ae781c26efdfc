//! Handler for the `scan` command.

use serde_json::json;

use crate::adapter::inbound::cli::command::ScanArgs;
use crate::adapter::inbound::cli::{output, render};
use crate::application::{pair_stats, top_spreads, venue_stats, RefreshOutcome, Snapshot};
use crate::domain::FrameGap;
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::infrastructure::factory::build_monitor;

/// Execute `scan`: one refresh, then the full report.
pub async fn execute(config: &Config, args: &ScanArgs) -> Result<()> {
    let query = config.scan_query(&args.query.overrides())?;
    let monitor = build_monitor(config);

    let pb = output::spinner(&format!(
        "Fetching {} funding from {} venues...",
        query.asset,
        monitor.venues().len()
    ));
    let outcome = match monitor.refresh(&query).await {
        Ok(outcome) => outcome,
        Err(e) => {
            output::spinner_fail(&pb, "Refresh failed");
            return Err(e);
        }
    };

    let snapshot = match outcome {
        RefreshOutcome::Published(snapshot) => snapshot,
        RefreshOutcome::Superseded { generation, newer } => {
            output::spinner_fail(&pb, "Refresh superseded");
            output::warning(&format!(
                "refresh {generation} was superseded by {newer}, nothing to report"
            ));
            return Ok(());
        }
    };
    output::spinner_success(&pb, "Fetched funding history");

    if output::is_json() {
        emit_json(&snapshot, args);
    } else {
        report(&snapshot, args);
    }
    Ok(())
}

fn emit_json(snapshot: &Snapshot, args: &ScanArgs) {
    let pairs: Vec<_> = snapshot
        .frame
        .spread_pairs()
        .into_iter()
        .filter_map(|(a, b)| pair_stats(&snapshot.frame, a, b))
        .collect();
    let top = snapshot.best_pair.as_ref().map(|pair| {
        top_spreads(&snapshot.frame, pair.long_venue, pair.short_venue, args.top)
    });

    output::json_output(json!({
        "type": "scan",
        "payload": {
            "snapshot": snapshot,
            "partial": snapshot.coverage.is_partial(),
            "venue_stats": venue_stats(&snapshot.frame),
            "pair_stats": pairs,
            "top_spreads": top,
        },
    }));
}

fn report(snapshot: &Snapshot, args: &ScanArgs) {
    output::section(&format!("{} Funding Scan", snapshot.asset));
    output::field(
        "Window",
        format!(
            "{} → {}",
            snapshot.window.start().format("%Y-%m-%d %H:%M"),
            snapshot.window.end().format("%Y-%m-%d %H:%M")
        ),
    );
    output::field("Resample", snapshot.frame.freq());
    output::field("Rows", snapshot.frame.len());

    output::section("Coverage");
    for (venue, coverage) in snapshot.coverage.iter() {
        output::field(venue.label(), render::coverage_label(coverage));
    }
    if snapshot.coverage.is_partial() {
        output::warning("Partial coverage: results use only the venues that reported");
    }

    match snapshot.frame.gap() {
        Some(FrameGap::NoData) => {
            output::warning("No venue returned data for this window");
            return;
        }
        Some(FrameGap::InsufficientVenues { venues }) => {
            let names: Vec<&str> = venues.iter().map(|v| v.as_str()).collect();
            output::warning(&format!(
                "Need at least two venues to compare, got: {}",
                names.join(", ")
            ));
        }
        None => {}
    }

    output::section("Best Pair");
    match &snapshot.best_pair {
        Some(pair) => {
            output::field("Long", output::highlight(pair.long_venue.label()));
            output::field("Short", output::highlight(pair.short_venue.label()));
            output::field(
                "Spread",
                output::signed(pair.spread, format!("{:.2} bps", pair.spread_bps())),
            );
            output::field(
                "APY",
                output::signed(
                    pair.annualized_yield,
                    format!("{:.2}%", pair.annualized_yield),
                ),
            );
        }
        None => output::note("No aligned row has two venues present"),
    }

    let summary = &snapshot.summary;
    output::section("Opportunities");
    output::field("Threshold", format!("{}%", snapshot.threshold_pct));
    output::field(
        "Found",
        format!(
            "{} of {} rows",
            summary.opportunities_found, summary.rows_considered
        ),
    );
    output::field("Avg spread", format!("{:.4}%", summary.avg_spread_pct));
    output::field("Max spread", format!("{:.4}%", summary.max_spread_pct));

    if snapshot.frame.is_empty() {
        return;
    }

    output::section("Venue Statistics");
    output::lines(&render::venue_stats_table(&venue_stats(&snapshot.frame)));

    let pairs: Vec<_> = snapshot
        .frame
        .spread_pairs()
        .into_iter()
        .filter_map(|(a, b)| pair_stats(&snapshot.frame, a, b))
        .collect();
    if !pairs.is_empty() {
        output::section("Pair Statistics (bps)");
        output::lines(&render::pair_stats_table(&pairs));
    }

    if let Some(pair) = &snapshot.best_pair {
        let top = top_spreads(&snapshot.frame, pair.long_venue, pair.short_venue, args.top);
        if !top.is_empty() {
            output::section("Top Spreads");
            output::lines(&render::top_spreads_table(
                &top,
                pair.long_venue,
                pair.short_venue,
            ));
        }
    }

    if let Some(rows) = args.rows {
        output::section("Aligned Rates (bps)");
        output::lines(&render::frame_table(&snapshot.frame, rows));
    }
}
