//! Drives a capped venue endpoint across a bounded window.
//!
//! A venue that returns at most `limit` rows per request is walked forward
//! page by page: a full page means more data may exist, so the next request
//! starts one millisecond after the newest row seen. The walk stops on a
//! short page, when the cursor would pass the window end, or when the cursor
//! fails to advance (a stalled upstream is treated as exhausted, not as an
//! error).

use chrono::{TimeZone, Utc};
use tracing::{debug, warn};

use crate::domain::{FundingObservation, Instrument, TimeRange, Venue, VenueSeries};
use crate::error::FetchError;
use crate::port::FundingPageSource;

/// Pagination driver for a [`FundingPageSource`].
pub struct Paginator<'a, S: ?Sized> {
    source: &'a S,
    require_data: bool,
}

impl<'a, S> Paginator<'a, S>
where
    S: FundingPageSource + ?Sized,
{
    /// Paginator accepting an empty result.
    pub const fn new(source: &'a S) -> Self {
        Self {
            source,
            require_data: false,
        }
    }

    /// Fail with [`FetchError::PaginationExhausted`] when no page held data.
    #[must_use]
    pub const fn require_data(mut self, required: bool) -> Self {
        self.require_data = required;
        self
    }

    /// Fetch every page in `range` and return one de-duplicated,
    /// chronologically ordered series.
    pub async fn collect(
        &self,
        instrument: &Instrument,
        range: &TimeRange,
    ) -> Result<VenueSeries, FetchError> {
        let venue = self.source.venue();
        let limit = self.source.page_limit().max(1);
        let end_ms = range.end_ms();

        let mut cursor = *range;
        let mut cursor_ms = range.start_ms();
        let mut observations: Vec<FundingObservation> = Vec::new();
        let mut dropped = 0;
        let mut pages = 0;

        loop {
            let page = self.source.fetch_page(instrument, &cursor).await?;
            pages += 1;

            let raw_rows = page.raw_rows();
            let newest_ms = page.last().map(FundingObservation::timestamp_ms);
            dropped += page.dropped();
            observations.extend(page.into_observations());

            debug!(
                venue = %venue,
                page = pages,
                rows = raw_rows,
                cursor_ms,
                "Fetched funding page"
            );

            if raw_rows < limit {
                break;
            }

            let Some(newest_ms) = newest_ms else {
                warn!(
                    venue = %venue,
                    page = pages,
                    "Full page without a valid row, stopping pagination"
                );
                break;
            };

            let next_ms = newest_ms.saturating_add(1);
            if next_ms > end_ms {
                break;
            }
            if next_ms <= cursor_ms {
                warn!(
                    venue = %venue,
                    page = pages,
                    cursor_ms,
                    next_ms,
                    "Pagination cursor did not advance, treating as exhausted"
                );
                break;
            }

            cursor_ms = next_ms;
            cursor = advance(range, next_ms, venue)?;
        }

        if observations.is_empty() && self.require_data {
            return Err(FetchError::PaginationExhausted { venue, pages });
        }

        // VenueSeries sorts stably and keeps the first row per timestamp.
        Ok(VenueSeries::new(venue, instrument.clone(), observations, dropped))
    }
}

/// Same window, starting at `start_ms`.
fn advance(range: &TimeRange, start_ms: i64, venue: Venue) -> Result<TimeRange, FetchError> {
    let start = Utc
        .timestamp_millis_opt(start_ms)
        .single()
        .ok_or(FetchError::InvalidRange {
            venue,
            start_ms,
            end_ms: range.end_ms(),
        })?;
    TimeRange::for_venue(venue, start, range.end())
}
