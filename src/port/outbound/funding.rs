//! Funding history ports.
//!
//! Every venue quirk (field names, units, request shaping, pagination style)
//! stays behind these traits; callers only ever see [`VenueSeries`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Instrument, TimeRange, Venue, VenueSeries};
use crate::error::FetchError;

/// Produces a canonical observation sequence for a time range.
///
/// Contract:
/// - `start > end` fails with [`FetchError::InvalidRange`].
/// - Network failures and non-2xx statuses fail with [`FetchError::Transport`].
/// - A payload violating the venue schema fails with [`FetchError::ResponseFormat`].
/// - Individual malformed rows are dropped and counted in
///   [`VenueSeries::dropped`]; they never fail the batch.
/// - No rows in range is an empty series, not an error.
#[async_trait]
pub trait FundingSource: Send + Sync {
    /// Venue this source reads from.
    fn venue(&self) -> Venue;

    /// Fetch funding observations for `instrument` within `[start, end]`.
    async fn fetch(
        &self,
        instrument: &Instrument,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<VenueSeries, FetchError>;
}

/// A single capped request against a venue that pages its history.
///
/// A page holding `page_limit()` raw rows (valid plus dropped) signals that
/// more data may follow. Driven by [`Paginator`](crate::application::Paginator).
#[async_trait]
pub trait FundingPageSource: Send + Sync {
    fn venue(&self) -> Venue;

    /// Maximum rows a single request returns.
    fn page_limit(&self) -> usize;

    /// Fetch one page starting at `range.start_ms()`.
    async fn fetch_page(
        &self,
        instrument: &Instrument,
        range: &TimeRange,
    ) -> Result<VenueSeries, FetchError>;
}
