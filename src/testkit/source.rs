//! Mock funding sources for testing.
//!
//! - [`ScriptedPageSource`] replays pre-loaded pages and records every
//!   requested cursor. Best for pagination behavior.
//! - [`StaticSource`] returns the same series on every fetch.
//! - [`FailingSource`] always fails with a fixed error.
//! - [`SlowSource`] answers after a delay. Pair with a paused tokio clock.
//! - [`GatedSource`] holds its first fetch until released, for ordering
//!   concurrent refreshes.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::domain::{FundingObservation, Instrument, TimeRange, Venue, VenueSeries};
use crate::error::FetchError;
use crate::port::{FundingPageSource, FundingSource};

// ---------------------------------------------------------------------------
// ScriptedPageSource
// ---------------------------------------------------------------------------

/// A page source that pops one scripted result per request.
///
/// An exhausted script answers with an empty page.
pub struct ScriptedPageSource {
    venue: Venue,
    limit: usize,
    pages: Mutex<VecDeque<Result<(Vec<FundingObservation>, usize), FetchError>>>,
    starts: Mutex<Vec<i64>>,
}

impl ScriptedPageSource {
    pub fn new(venue: Venue, limit: usize) -> Self {
        Self {
            venue,
            limit,
            pages: Mutex::new(VecDeque::new()),
            starts: Mutex::new(Vec::new()),
        }
    }

    pub fn page(self, observations: Vec<FundingObservation>) -> Self {
        self.page_with_dropped(observations, 0)
    }

    /// Page that also reports `dropped` malformed rows.
    pub fn page_with_dropped(self, observations: Vec<FundingObservation>, dropped: usize) -> Self {
        self.pages.lock().push_back(Ok((observations, dropped)));
        self
    }

    pub fn fail(self, error: FetchError) -> Self {
        self.pages.lock().push_back(Err(error));
        self
    }

    /// Start of every requested window, in epoch milliseconds.
    pub fn requested_starts(&self) -> Vec<i64> {
        self.starts.lock().clone()
    }
}

#[async_trait]
impl FundingPageSource for ScriptedPageSource {
    fn venue(&self) -> Venue {
        self.venue
    }

    fn page_limit(&self) -> usize {
        self.limit
    }

    async fn fetch_page(
        &self,
        instrument: &Instrument,
        range: &TimeRange,
    ) -> Result<VenueSeries, FetchError> {
        self.starts.lock().push(range.start_ms());
        let next = self.pages.lock().pop_front();
        match next {
            Some(Ok((observations, dropped))) => Ok(VenueSeries::new(
                self.venue,
                instrument.clone(),
                observations,
                dropped,
            )),
            Some(Err(error)) => Err(error),
            None => Ok(VenueSeries::empty(self.venue, instrument.clone())),
        }
    }
}

// ---------------------------------------------------------------------------
// StaticSource
// ---------------------------------------------------------------------------

/// A source that returns a fixed series regardless of the window.
pub struct StaticSource {
    series: VenueSeries,
    calls: Arc<AtomicU32>,
}

impl StaticSource {
    pub fn new(series: VenueSeries) -> Self {
        Self {
            series,
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Shared counter, readable after the source moved into a monitor.
    pub fn call_counter(&self) -> Arc<AtomicU32> {
        self.calls.clone()
    }
}

#[async_trait]
impl FundingSource for StaticSource {
    fn venue(&self) -> Venue {
        self.series.venue()
    }

    async fn fetch(
        &self,
        _instrument: &Instrument,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<VenueSeries, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.series.clone())
    }
}

// ---------------------------------------------------------------------------
// FailingSource
// ---------------------------------------------------------------------------

/// A source whose every fetch fails with the same error.
pub struct FailingSource {
    error: FetchError,
}

impl FailingSource {
    pub fn new(error: FetchError) -> Self {
        Self { error }
    }

    /// Transport failure for `venue`.
    pub fn transport(venue: Venue, reason: &str) -> Self {
        Self::new(FetchError::Transport {
            venue,
            reason: reason.to_string(),
        })
    }
}

#[async_trait]
impl FundingSource for FailingSource {
    fn venue(&self) -> Venue {
        self.error.venue()
    }

    async fn fetch(
        &self,
        _instrument: &Instrument,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<VenueSeries, FetchError> {
        Err(self.error.clone())
    }
}

// ---------------------------------------------------------------------------
// SlowSource
// ---------------------------------------------------------------------------

/// A source that sleeps before returning its series.
pub struct SlowSource {
    series: VenueSeries,
    delay: Duration,
}

impl SlowSource {
    pub fn new(series: VenueSeries, delay: Duration) -> Self {
        Self { series, delay }
    }
}

#[async_trait]
impl FundingSource for SlowSource {
    fn venue(&self) -> Venue {
        self.series.venue()
    }

    async fn fetch(
        &self,
        _instrument: &Instrument,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<VenueSeries, FetchError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.series.clone())
    }
}

// ---------------------------------------------------------------------------
// GatedSource
// ---------------------------------------------------------------------------

/// A source whose first fetch blocks until [`GatedSource::release`] fires.
///
/// Later fetches return immediately.
pub struct GatedSource {
    series: VenueSeries,
    entered: Arc<Notify>,
    gate: Arc<Notify>,
    calls: AtomicU32,
}

impl GatedSource {
    pub fn new(series: VenueSeries) -> Self {
        Self {
            series,
            entered: Arc::new(Notify::new()),
            gate: Arc::new(Notify::new()),
            calls: AtomicU32::new(0),
        }
    }

    /// Signalled once the first fetch is waiting on the gate.
    pub fn entered(&self) -> Arc<Notify> {
        self.entered.clone()
    }

    /// Handle that releases the held fetch via `notify_one`.
    pub fn release(&self) -> Arc<Notify> {
        self.gate.clone()
    }
}

#[async_trait]
impl FundingSource for GatedSource {
    fn venue(&self) -> Venue {
        self.series.venue()
    }

    async fn fetch(
        &self,
        _instrument: &Instrument,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<VenueSeries, FetchError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            self.entered.notify_one();
            self.gate.notified().await;
        }
        Ok(self.series.clone())
    }
}
