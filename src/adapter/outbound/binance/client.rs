//! Binance REST client.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client as HttpClient;
use tracing::debug;

use super::dto::parse_page;
use super::settings::BinanceSettings;
use crate::adapter::outbound::http::{endpoint, get_json};
use crate::application::Paginator;
use crate::domain::{Instrument, TimeRange, Venue, VenueSeries};
use crate::error::FetchError;
use crate::port::{FundingPageSource, FundingSource};

const FUNDING_RATE_PATH: &str = "/fapi/v1/fundingRate";

pub struct BinanceClient {
    http: HttpClient,
    base_url: String,
    page_limit: usize,
}

impl BinanceClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::from_config(&BinanceSettings {
            base_url: base_url.into(),
            ..BinanceSettings::default()
        })
    }

    #[must_use]
    pub fn from_config(settings: &BinanceSettings) -> Self {
        Self {
            http: settings.http().build_client(),
            base_url: settings.base_url.clone(),
            page_limit: settings.page_limit,
        }
    }
}

#[async_trait]
impl FundingPageSource for BinanceClient {
    fn venue(&self) -> Venue {
        Venue::Binance
    }

    fn page_limit(&self) -> usize {
        self.page_limit
    }

    async fn fetch_page(
        &self,
        instrument: &Instrument,
        range: &TimeRange,
    ) -> Result<VenueSeries, FetchError> {
        let url = endpoint(&self.base_url, FUNDING_RATE_PATH);
        let query = [
            ("symbol", instrument.to_string()),
            ("startTime", range.start_ms().to_string()),
            ("endTime", range.end_ms().to_string()),
            ("limit", self.page_limit.to_string()),
        ];
        let body = get_json(&self.http, Venue::Binance, &url, &query).await?;
        parse_page(instrument, body)
    }
}

#[async_trait]
impl FundingSource for BinanceClient {
    fn venue(&self) -> Venue {
        Venue::Binance
    }

    async fn fetch(
        &self,
        instrument: &Instrument,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<VenueSeries, FetchError> {
        let range = TimeRange::for_venue(Venue::Binance, start, end)?;
        let series = Paginator::new(self).collect(instrument, &range).await?;
        debug!(
            venue = %Venue::Binance,
            symbol = %instrument,
            rows = series.len(),
            dropped = series.dropped(),
            "Fetched funding history"
        );
        Ok(series)
    }
}
