//! Refresh cycle: fetch every venue, align, rank, summarize, publish.
//!
//! Venue fetches run concurrently, each under one deadline covering all of
//! its pages. A venue that fails or times out is recorded in [`Coverage`]
//! and left out of the cycle; it never aborts the refresh. Only caller
//! misuse (an invalid [`ScanQuery`]) is an error.
//!
//! Published state is an immutable [`Snapshot`] behind an `Arc`, swapped
//! under a write lock. Each refresh takes a generation number when it
//! starts and publishes only if no newer refresh has started since.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use futures_util::future::join_all;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::align::{FillPolicy, SeriesAligner};
use super::ranking::SpreadRanker;
use super::stats::summarize;
use crate::domain::{
    AlignedFrame, BestPair, Frequency, Instrument, OpportunitySummary, TimeRange, Venue,
    VenueSeries,
};
use crate::error::{ConfigError, Result};
use crate::port::FundingSource;

/// Default bound on one venue's fetch, pages included.
pub const DEFAULT_FETCH_DEADLINE: StdDuration = StdDuration::from_secs(15);

/// Longest accepted lookback.
pub const MAX_LOOKBACK_DAYS: i64 = 3_650;

/// Largest aligned grid a query may produce.
pub const MAX_GRID_CELLS: i64 = 500_000;

/// The caller-supplied parameters of one refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanQuery {
    pub asset: String,
    pub lookback: Duration,
    pub freq: Frequency,
    /// Spread threshold in percent (`0.01` = 0.01%).
    pub threshold_pct: Decimal,
}

impl ScanQuery {
    /// Build and validate a query.
    pub fn new(
        asset: impl Into<String>,
        lookback: Duration,
        freq: Frequency,
        threshold_pct: Decimal,
    ) -> std::result::Result<Self, ConfigError> {
        let query = Self {
            asset: asset.into(),
            lookback,
            freq,
            threshold_pct,
        };
        query.validate()?;
        Ok(query)
    }

    /// Lookback expressed in whole days.
    pub fn days(
        asset: impl Into<String>,
        lookback_days: u32,
        freq: Frequency,
        threshold_pct: Decimal,
    ) -> std::result::Result<Self, ConfigError> {
        Self::new(
            asset,
            Duration::days(i64::from(lookback_days)),
            freq,
            threshold_pct,
        )
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.asset.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "scan.asset",
            });
        }
        if self.lookback <= Duration::zero() {
            return Err(ConfigError::InvalidValue {
                field: "scan.lookback_days",
                reason: "must be greater than 0".into(),
            });
        }
        if self.lookback > Duration::days(MAX_LOOKBACK_DAYS) {
            return Err(ConfigError::InvalidValue {
                field: "scan.lookback_days",
                reason: format!("must be at most {MAX_LOOKBACK_DAYS}"),
            });
        }
        let cells = self.lookback.num_milliseconds() / self.freq.as_millis();
        if cells > MAX_GRID_CELLS {
            return Err(ConfigError::InvalidValue {
                field: "scan.resample",
                reason: format!(
                    "{} over the lookback gives {cells} rows, limit is {MAX_GRID_CELLS}",
                    self.freq
                ),
            });
        }
        if self.threshold_pct < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "scan.threshold_pct",
                reason: "must not be negative".into(),
            });
        }
        Ok(())
    }
}

/// What one venue contributed to a refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VenueCoverage {
    Reported { observations: usize, dropped: usize },
    /// Fetched fine, but nothing fell inside the window.
    Empty { dropped: usize },
    Failed { reason: String },
    /// Deadline hit; any pages already fetched were discarded.
    TimedOut { deadline_ms: u64 },
    /// No instrument configured for the asset on this venue.
    Unmapped,
}

impl VenueCoverage {
    #[must_use]
    pub const fn is_reported(&self) -> bool {
        matches!(self, Self::Reported { .. })
    }

    #[must_use]
    pub const fn dropped(&self) -> usize {
        match self {
            Self::Reported { dropped, .. } | Self::Empty { dropped } => *dropped,
            _ => 0,
        }
    }
}

/// Per-venue outcome of one refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Coverage {
    venues: BTreeMap<Venue, VenueCoverage>,
}

impl Coverage {
    pub fn record(&mut self, venue: Venue, coverage: VenueCoverage) {
        self.venues.insert(venue, coverage);
    }

    #[must_use]
    pub fn get(&self, venue: Venue) -> Option<&VenueCoverage> {
        self.venues.get(&venue)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Venue, &VenueCoverage)> {
        self.venues.iter().map(|(venue, coverage)| (*venue, coverage))
    }

    /// Venues that contributed observations.
    #[must_use]
    pub fn reporting(&self) -> Vec<Venue> {
        self.iter()
            .filter(|(_, coverage)| coverage.is_reported())
            .map(|(venue, _)| venue)
            .collect()
    }

    /// Whether any configured venue is missing from this cycle.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.venues.values().any(|coverage| !coverage.is_reported())
    }

    #[must_use]
    pub fn dropped(&self) -> usize {
        self.venues.values().map(VenueCoverage::dropped).sum()
    }
}

/// Everything one refresh produced, tagged with its fetch time.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub generation: u64,
    pub asset: String,
    pub fetched_at: DateTime<Utc>,
    pub window: TimeRange,
    pub threshold_pct: Decimal,
    pub frame: AlignedFrame,
    pub best_pair: Option<BestPair>,
    pub summary: OpportunitySummary,
    pub coverage: Coverage,
}

impl Snapshot {
    /// Time elapsed since the data was fetched.
    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.fetched_at
    }
}

/// Result of [`FundingMonitor::refresh`].
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    /// The snapshot is now what [`FundingMonitor::latest`] returns.
    Published(Arc<Snapshot>),
    /// A newer refresh started while this one ran; its result was discarded.
    Superseded { generation: u64, newer: u64 },
}

impl RefreshOutcome {
    #[must_use]
    pub fn snapshot(&self) -> Option<&Arc<Snapshot>> {
        match self {
            Self::Published(snapshot) => Some(snapshot),
            Self::Superseded { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_published(&self) -> bool {
        matches!(self, Self::Published(_))
    }
}

/// Pull-based query surface over a set of venue sources.
pub struct FundingMonitor {
    sources: Vec<Arc<dyn FundingSource>>,
    instruments: BTreeMap<String, BTreeMap<Venue, Instrument>>,
    policies: BTreeMap<Venue, FillPolicy>,
    ranker: SpreadRanker,
    fetch_deadline: StdDuration,
    latest: RwLock<Option<Arc<Snapshot>>>,
    generation: AtomicU64,
}

impl FundingMonitor {
    #[must_use]
    pub fn new(sources: Vec<Arc<dyn FundingSource>>) -> Self {
        Self {
            sources,
            instruments: BTreeMap::new(),
            policies: BTreeMap::new(),
            ranker: SpreadRanker::default(),
            fetch_deadline: DEFAULT_FETCH_DEADLINE,
            latest: RwLock::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Map `asset` to its per-venue instrument symbols.
    #[must_use]
    pub fn with_instruments(
        mut self,
        asset: impl Into<String>,
        instruments: BTreeMap<Venue, Instrument>,
    ) -> Self {
        self.instruments.insert(asset.into(), instruments);
        self
    }

    #[must_use]
    pub fn with_fill_policy(mut self, venue: Venue, policy: FillPolicy) -> Self {
        self.policies.insert(venue, policy);
        self
    }

    #[must_use]
    pub fn with_ranker(mut self, ranker: SpreadRanker) -> Self {
        self.ranker = ranker;
        self
    }

    #[must_use]
    pub const fn with_fetch_deadline(mut self, deadline: StdDuration) -> Self {
        self.fetch_deadline = deadline;
        self
    }

    /// Venues this monitor fetches from.
    #[must_use]
    pub fn venues(&self) -> Vec<Venue> {
        self.sources.iter().map(|source| source.venue()).collect()
    }

    #[must_use]
    pub fn ranker(&self) -> &SpreadRanker {
        &self.ranker
    }

    /// Last published snapshot, if any refresh has completed.
    #[must_use]
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.latest.read().clone()
    }

    /// Refresh for the window ending now.
    pub async fn refresh(&self, query: &ScanQuery) -> Result<RefreshOutcome> {
        self.refresh_at(query, Utc::now()).await
    }

    /// Refresh for the window ending at `now`.
    pub async fn refresh_at(&self, query: &ScanQuery, now: DateTime<Utc>) -> Result<RefreshOutcome> {
        query.validate()?;
        if self.fetch_deadline.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "monitor.fetch_deadline_ms",
                reason: "must be greater than 0".into(),
            }
            .into());
        }
        let mapping = self
            .instruments
            .get(&query.asset)
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "scan.asset",
                reason: format!("no instruments configured for {}", query.asset),
            })?;

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let window = TimeRange::trailing(now, query.lookback);
        debug!(generation, asset = %query.asset, "Refresh started");

        let (series, coverage) = self.fetch_all(mapping, &window).await;

        let mut aligner = SeriesAligner::new(query.freq);
        for (venue, policy) in &self.policies {
            aligner = aligner.with_policy(*venue, *policy);
        }
        let frame = aligner.align(&series);
        let best_pair = frame
            .latest_complete_row()
            .and_then(|row| self.ranker.best_pair_at(&row));
        let summary = summarize(&frame, query.threshold_pct);

        let snapshot = Arc::new(Snapshot {
            generation,
            asset: query.asset.clone(),
            fetched_at: now,
            window,
            threshold_pct: query.threshold_pct,
            frame,
            best_pair,
            summary,
            coverage,
        });

        let mut latest = self.latest.write();
        let newest = self.generation.load(Ordering::SeqCst);
        if newest != generation {
            warn!(generation, newer = newest, "Refresh superseded, discarding result");
            return Ok(RefreshOutcome::Superseded {
                generation,
                newer: newest,
            });
        }
        *latest = Some(snapshot.clone());
        drop(latest);

        info!(
            generation,
            asset = %snapshot.asset,
            rows = snapshot.frame.len(),
            partial = snapshot.coverage.is_partial(),
            opportunities = snapshot.summary.opportunities_found,
            "Snapshot published"
        );
        Ok(RefreshOutcome::Published(snapshot))
    }

    async fn fetch_all(
        &self,
        mapping: &BTreeMap<Venue, Instrument>,
        window: &TimeRange,
    ) -> (BTreeMap<Venue, VenueSeries>, Coverage) {
        let deadline = self.fetch_deadline;
        let fetches = self.sources.iter().map(|source| {
            let venue = source.venue();
            let instrument = mapping.get(&venue).cloned();
            async move {
                let Some(instrument) = instrument else {
                    return (venue, Err(VenueCoverage::Unmapped));
                };
                let fetch = source.fetch(&instrument, window.start(), window.end());
                match tokio::time::timeout(deadline, fetch).await {
                    Ok(Ok(series)) => (venue, Ok(series)),
                    Ok(Err(error)) => {
                        warn!(venue = %venue, error = %error, "Venue fetch failed");
                        (
                            venue,
                            Err(VenueCoverage::Failed {
                                reason: error.to_string(),
                            }),
                        )
                    }
                    Err(_) => {
                        let deadline_ms = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX);
                        warn!(venue = %venue, deadline_ms, "Venue fetch timed out");
                        (venue, Err(VenueCoverage::TimedOut { deadline_ms }))
                    }
                }
            }
        });

        let mut series_by_venue = BTreeMap::new();
        let mut coverage = Coverage::default();
        for (venue, result) in join_all(fetches).await {
            match result {
                Ok(series) => {
                    let dropped = series.dropped();
                    if dropped > 0 {
                        warn!(venue = %venue, dropped, "Dropped malformed funding rows");
                    }
                    if series.is_empty() {
                        coverage.record(venue, VenueCoverage::Empty { dropped });
                    } else {
                        coverage.record(
                            venue,
                            VenueCoverage::Reported {
                                observations: series.len(),
                                dropped,
                            },
                        );
                        series_by_venue.insert(venue, series);
                    }
                }
                Err(missing) => coverage.record(venue, missing),
            }
        }
        (series_by_venue, coverage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FrameGap;
    use crate::error::{Error, FetchError};
    use crate::testkit::domain::{at_hour, hourly, instrument};
    use crate::testkit::source::{FailingSource, GatedSource, SlowSource, StaticSource};
    use rust_decimal_macros::dec;

    fn btc() -> BTreeMap<Venue, Instrument> {
        Venue::ALL
            .iter()
            .map(|venue| (*venue, instrument(*venue)))
            .collect()
    }

    fn query() -> ScanQuery {
        ScanQuery::days("BTC", 1, Frequency::hours(1).unwrap(), dec!(0.01)).unwrap()
    }

    fn monitor(sources: Vec<Arc<dyn FundingSource>>) -> FundingMonitor {
        FundingMonitor::new(sources).with_instruments("BTC", btc())
    }

    #[tokio::test]
    async fn publishes_snapshot_with_best_pair() {
        let monitor = monitor(vec![
            Arc::new(StaticSource::new(hourly(
                Venue::Hyperliquid,
                &[dec!(0.0002), dec!(0.0010)],
            ))),
            Arc::new(StaticSource::new(hourly(
                Venue::Derive,
                &[dec!(0.0001), dec!(0.0003)],
            ))),
            Arc::new(StaticSource::new(hourly(
                Venue::Binance,
                &[dec!(0.0001), dec!(-0.0002)],
            ))),
        ]);

        let outcome = monitor.refresh_at(&query(), at_hour(2)).await.unwrap();
        let snapshot = outcome.snapshot().unwrap();

        assert_eq!(snapshot.generation, 1);
        assert!(!snapshot.coverage.is_partial());
        let pair = snapshot.best_pair.as_ref().unwrap();
        assert_eq!(pair.long_venue, Venue::Hyperliquid);
        assert_eq!(pair.short_venue, Venue::Binance);
        assert_eq!(pair.annualized_yield, dec!(131.4));
        assert_eq!(snapshot.summary.rows_considered, 2);
        assert_eq!(snapshot.summary.opportunities_found, 2);
        assert_eq!(monitor.latest().unwrap().generation, 1);
        assert_eq!(snapshot.age(at_hour(3)), Duration::hours(1));
    }

    #[tokio::test]
    async fn failed_venue_degrades_to_partial_coverage() {
        let monitor = monitor(vec![
            Arc::new(StaticSource::new(hourly(Venue::Hyperliquid, &[dec!(0.0004)]))),
            Arc::new(FailingSource::transport(Venue::Derive, "HTTP 503")),
            Arc::new(StaticSource::new(hourly(Venue::Binance, &[dec!(0.0001)]))),
        ]);

        let outcome = monitor.refresh_at(&query(), at_hour(1)).await.unwrap();
        let snapshot = outcome.snapshot().unwrap();

        assert!(snapshot.coverage.is_partial());
        assert!(matches!(
            snapshot.coverage.get(Venue::Derive),
            Some(VenueCoverage::Failed { .. })
        ));
        assert_eq!(
            snapshot.coverage.reporting(),
            vec![Venue::Hyperliquid, Venue::Binance]
        );
        assert_eq!(snapshot.best_pair.as_ref().unwrap().spread, dec!(0.0003));
    }

    #[tokio::test]
    async fn single_reporting_venue_yields_no_pair() {
        let monitor = monitor(vec![
            Arc::new(StaticSource::new(hourly(Venue::Hyperliquid, &[dec!(0.0004)]))),
            Arc::new(FailingSource::new(FetchError::ResponseFormat {
                venue: Venue::Binance,
                reason: "expected array".into(),
            })),
        ]);

        let outcome = monitor.refresh_at(&query(), at_hour(1)).await.unwrap();
        let snapshot = outcome.snapshot().unwrap();
        assert!(snapshot.best_pair.is_none());
        assert_eq!(
            snapshot.frame.gap(),
            Some(&FrameGap::InsufficientVenues {
                venues: vec![Venue::Hyperliquid]
            })
        );
        assert_eq!(snapshot.summary, OpportunitySummary::default());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_venue_is_dropped_at_deadline() {
        let monitor = monitor(vec![
            Arc::new(StaticSource::new(hourly(Venue::Hyperliquid, &[dec!(0.0004)]))),
            Arc::new(StaticSource::new(hourly(Venue::Binance, &[dec!(0.0001)]))),
            Arc::new(SlowSource::new(
                hourly(Venue::Derive, &[dec!(0.0009)]),
                StdDuration::from_secs(60),
            )),
        ])
        .with_fetch_deadline(StdDuration::from_secs(2));

        let outcome = monitor.refresh_at(&query(), at_hour(1)).await.unwrap();
        let snapshot = outcome.snapshot().unwrap();
        assert_eq!(
            snapshot.coverage.get(Venue::Derive),
            Some(&VenueCoverage::TimedOut { deadline_ms: 2000 })
        );
        assert!(snapshot.frame.column(Venue::Derive).is_none());
        assert_eq!(snapshot.best_pair.as_ref().unwrap().long_venue, Venue::Hyperliquid);
    }

    #[tokio::test]
    async fn unmapped_venue_is_reported_not_fetched() {
        let binance = StaticSource::new(hourly(Venue::Binance, &[dec!(0.0001)]));
        let calls = binance.call_counter();
        let mut mapping = btc();
        mapping.remove(&Venue::Binance);

        let monitor = FundingMonitor::new(vec![
            Arc::new(StaticSource::new(hourly(Venue::Hyperliquid, &[dec!(0.0004)]))),
            Arc::new(binance),
        ])
        .with_instruments("BTC", mapping);

        let outcome = monitor.refresh_at(&query(), at_hour(1)).await.unwrap();
        assert_eq!(
            outcome.snapshot().unwrap().coverage.get(Venue::Binance),
            Some(&VenueCoverage::Unmapped)
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_query_is_fatal() {
        let monitor = monitor(vec![]);

        let mut bad = query();
        bad.threshold_pct = dec!(-1);
        let err = monitor.refresh_at(&bad, at_hour(1)).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "scan.threshold_pct",
                ..
            })
        ));

        let mut unknown = query();
        unknown.asset = "DOGE".into();
        let err = monitor.refresh_at(&unknown, at_hour(1)).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "scan.asset",
                ..
            })
        ));
        assert!(monitor.latest().is_none());
    }

    #[test]
    fn query_rejects_empty_asset_and_zero_lookback() {
        let freq = Frequency::hours(1).unwrap();
        assert!(matches!(
            ScanQuery::days(" ", 7, freq, dec!(0.01)),
            Err(ConfigError::MissingField { field: "scan.asset" })
        ));
        assert!(matches!(
            ScanQuery::days("BTC", 0, freq, dec!(0.01)),
            Err(ConfigError::InvalidValue {
                field: "scan.lookback_days",
                ..
            })
        ));
    }

    #[test]
    fn query_rejects_oversized_lookback_and_grid() {
        let freq = Frequency::hours(1).unwrap();
        assert!(ScanQuery::days("BTC", 3_650, freq, dec!(0.01)).is_ok());
        assert!(matches!(
            ScanQuery::days("BTC", 4_000_000_000, freq, dec!(0.01)),
            Err(ConfigError::InvalidValue {
                field: "scan.lookback_days",
                ..
            })
        ));

        let second = Frequency::parse("1s").unwrap();
        assert!(matches!(
            ScanQuery::days("BTC", 90, second, dec!(0.01)),
            Err(ConfigError::InvalidValue {
                field: "scan.resample",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn huge_lookback_fails_before_fetching() {
        let source = StaticSource::new(hourly(Venue::Binance, &[dec!(0.0001)]));
        let calls = source.call_counter();
        let monitor = monitor(vec![Arc::new(source)]);

        let mut huge = query();
        huge.lookback = Duration::days(4_000_000_000);
        let err = monitor.refresh_at(&huge, at_hour(1)).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "scan.lookback_days",
                ..
            })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn stale_refresh_is_superseded() {
        let gated = GatedSource::new(hourly(Venue::Hyperliquid, &[dec!(0.0004)]));
        let entered = gated.entered();
        let release = gated.release();
        let monitor = Arc::new(monitor(vec![
            Arc::new(gated),
            Arc::new(StaticSource::new(hourly(Venue::Binance, &[dec!(0.0001)]))),
        ]));

        let stale = tokio::spawn({
            let monitor = monitor.clone();
            let query = query();
            async move { monitor.refresh_at(&query, at_hour(1)).await }
        });
        entered.notified().await;

        let fresh = monitor.refresh_at(&query(), at_hour(2)).await.unwrap();
        assert!(fresh.is_published());

        release.notify_one();
        let stale = stale.await.unwrap().unwrap();
        assert!(matches!(
            stale,
            RefreshOutcome::Superseded {
                generation: 1,
                newer: 2
            }
        ));

        let latest = monitor.latest().unwrap();
        assert_eq!(latest.generation, 2);
        assert_eq!(latest.fetched_at, at_hour(2));
    }
}
