//! End-to-end refresh cycles against scripted venue sources.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use fundwatch::application::{
    FillPolicy, FundingMonitor, RefreshOutcome, ScanQuery, VenueCoverage,
};
use fundwatch::domain::{FrameGap, Frequency, Instrument, Venue};
use fundwatch::port::FundingSource;
use fundwatch::testkit::domain::{at_hour, hourly, instrument, obs_hour, series};
use fundwatch::testkit::source::{FailingSource, SlowSource, StaticSource};
use rust_decimal_macros::dec;

fn btc() -> BTreeMap<Venue, Instrument> {
    Venue::ALL.iter().map(|v| (*v, instrument(*v))).collect()
}

fn query(threshold: rust_decimal::Decimal) -> ScanQuery {
    ScanQuery::days("BTC", 1, Frequency::hours(1).unwrap(), threshold).unwrap()
}

#[tokio::test]
async fn mixed_cadence_venues_align_and_rank() {
    // Hyperliquid and Derive settle hourly, Binance every eight hours.
    let sources: Vec<Arc<dyn FundingSource>> = vec![
        Arc::new(StaticSource::new(hourly(
            Venue::Hyperliquid,
            &[dec!(0.0001); 10],
        ))),
        Arc::new(StaticSource::new(hourly(
            Venue::Derive,
            &[dec!(0.0002); 10],
        ))),
        Arc::new(StaticSource::new(series(
            Venue::Binance,
            vec![
                obs_hour(Venue::Binance, 0, dec!(0.0005)),
                obs_hour(Venue::Binance, 8, dec!(0.0006)),
            ],
        ))),
    ];
    let monitor = FundingMonitor::new(sources).with_instruments("BTC", btc());

    let outcome = monitor.refresh_at(&query(dec!(0.03)), at_hour(10)).await.unwrap();
    let snapshot = outcome.snapshot().unwrap();
    let frame = &snapshot.frame;

    assert_eq!(frame.len(), 10);
    assert!(frame.gap().is_none());
    for index in 0..8 {
        assert_eq!(frame.rate(Venue::Binance, index), Some(dec!(0.0005)));
    }
    assert_eq!(frame.rate(Venue::Binance, 9), Some(dec!(0.0006)));

    let pair = snapshot.best_pair.as_ref().unwrap();
    assert_eq!(pair.long_venue, Venue::Binance);
    assert_eq!(pair.short_venue, Venue::Hyperliquid);
    assert_eq!(pair.spread, dec!(0.0005));

    // Spreads: 0.04% for hours 0..7, 0.05% after.
    assert_eq!(snapshot.summary.rows_considered, 10);
    assert_eq!(snapshot.summary.opportunities_found, 10);
    assert_eq!(snapshot.summary.max_spread_pct, dec!(0.05));
}

#[tokio::test]
async fn forced_mean_policy_leaves_gaps_between_settlements() {
    let sources: Vec<Arc<dyn FundingSource>> = vec![
        Arc::new(StaticSource::new(hourly(
            Venue::Hyperliquid,
            &[dec!(0.0001); 9],
        ))),
        Arc::new(StaticSource::new(series(
            Venue::Binance,
            vec![
                obs_hour(Venue::Binance, 0, dec!(0.0005)),
                obs_hour(Venue::Binance, 8, dec!(0.0006)),
            ],
        ))),
    ];
    let monitor = FundingMonitor::new(sources)
        .with_instruments("BTC", btc())
        .with_fill_policy(Venue::Binance, FillPolicy::Mean);

    let outcome = monitor.refresh_at(&query(dec!(0)), at_hour(9)).await.unwrap();
    let snapshot = outcome.snapshot().unwrap();

    assert_eq!(snapshot.frame.rate(Venue::Binance, 4), None);
    assert_eq!(snapshot.summary.rows_considered, 2);
}

#[tokio::test]
async fn every_venue_failing_yields_no_data_snapshot() {
    let sources: Vec<Arc<dyn FundingSource>> = Venue::ALL
        .iter()
        .map(|venue| {
            Arc::new(FailingSource::transport(*venue, "HTTP 502")) as Arc<dyn FundingSource>
        })
        .collect();
    let monitor = FundingMonitor::new(sources).with_instruments("BTC", btc());

    let outcome = monitor.refresh_at(&query(dec!(0.01)), at_hour(5)).await.unwrap();
    let snapshot = outcome.snapshot().unwrap();

    assert_eq!(snapshot.frame.gap(), Some(&FrameGap::NoData));
    assert!(snapshot.best_pair.is_none());
    assert_eq!(snapshot.summary.opportunities_found, 0);
    assert!(snapshot.coverage.reporting().is_empty());
    assert!(matches!(
        snapshot.coverage.get(Venue::Derive),
        Some(VenueCoverage::Failed { reason }) if reason.contains("HTTP 502")
    ));
}

#[tokio::test(start_paused = true)]
async fn slow_venue_does_not_block_the_others() {
    let sources: Vec<Arc<dyn FundingSource>> = vec![
        Arc::new(StaticSource::new(hourly(
            Venue::Hyperliquid,
            &[dec!(0.0004), dec!(0.0004)],
        ))),
        Arc::new(SlowSource::new(
            hourly(Venue::Derive, &[dec!(0.0009), dec!(0.0009)]),
            Duration::from_secs(60),
        )),
        Arc::new(StaticSource::new(hourly(
            Venue::Binance,
            &[dec!(0.0001), dec!(0.0001)],
        ))),
    ];
    let monitor = FundingMonitor::new(sources)
        .with_instruments("BTC", btc())
        .with_fetch_deadline(Duration::from_secs(2));

    let outcome = monitor.refresh_at(&query(dec!(0.01)), at_hour(2)).await.unwrap();
    let snapshot = outcome.snapshot().unwrap();

    assert_eq!(
        snapshot.coverage.get(Venue::Derive),
        Some(&VenueCoverage::TimedOut { deadline_ms: 2000 })
    );
    assert!(snapshot.coverage.is_partial());
    let pair = snapshot.best_pair.as_ref().unwrap();
    assert_eq!(pair.long_venue, Venue::Hyperliquid);
    assert_eq!(pair.short_venue, Venue::Binance);
}

#[tokio::test]
async fn consecutive_refreshes_publish_increasing_generations() {
    let source = StaticSource::new(hourly(Venue::Hyperliquid, &[dec!(0.0001)]));
    let calls = source.call_counter();
    let monitor = FundingMonitor::new(vec![
        Arc::new(source) as Arc<dyn FundingSource>,
        Arc::new(StaticSource::new(hourly(Venue::Binance, &[dec!(0.0002)]))),
    ])
    .with_instruments("BTC", btc());

    let first = monitor.refresh_at(&query(dec!(0.01)), at_hour(1)).await.unwrap();
    let second = monitor.refresh_at(&query(dec!(0.01)), at_hour(2)).await.unwrap();

    assert!(matches!(first, RefreshOutcome::Published(ref s) if s.generation == 1));
    assert!(second.is_published());
    assert_eq!(monitor.latest().unwrap().generation, 2);
    assert_eq!(monitor.latest().unwrap().fetched_at, at_hour(2));
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
}
