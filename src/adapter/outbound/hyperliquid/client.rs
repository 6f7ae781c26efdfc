//! Hyperliquid REST client.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client as HttpClient;
use tracing::debug;

use super::dto::{parse_history, parse_predicted, InfoRequest};
use super::settings::HyperliquidSettings;
use crate::adapter::outbound::http::{endpoint, post_json};
use crate::application::Paginator;
use crate::domain::{Instrument, PredictedFunding, TimeRange, Venue, VenueSeries};
use crate::error::FetchError;
use crate::port::{FundingPageSource, FundingSource};

const INFO_PATH: &str = "/info";

pub struct HyperliquidClient {
    http: HttpClient,
    base_url: String,
    page_limit: usize,
}

impl HyperliquidClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::from_config(&HyperliquidSettings {
            base_url: base_url.into(),
            ..HyperliquidSettings::default()
        })
    }

    #[must_use]
    pub fn from_config(settings: &HyperliquidSettings) -> Self {
        Self {
            http: settings.http().build_client(),
            base_url: settings.base_url.clone(),
            page_limit: settings.page_limit,
        }
    }

    /// Predicted next funding for every asset and publishing venue.
    pub async fn predicted_fundings(&self) -> Result<Vec<PredictedFunding>, FetchError> {
        let url = endpoint(&self.base_url, INFO_PATH);
        let body = post_json(
            &self.http,
            Venue::Hyperliquid,
            &url,
            &InfoRequest::PredictedFundings,
        )
        .await?;
        let predicted = parse_predicted(body)?;
        debug!(entries = predicted.len(), "Fetched predicted fundings");
        Ok(predicted)
    }
}

#[async_trait]
impl FundingPageSource for HyperliquidClient {
    fn venue(&self) -> Venue {
        Venue::Hyperliquid
    }

    fn page_limit(&self) -> usize {
        self.page_limit
    }

    async fn fetch_page(
        &self,
        instrument: &Instrument,
        range: &TimeRange,
    ) -> Result<VenueSeries, FetchError> {
        let url = endpoint(&self.base_url, INFO_PATH);
        let request = InfoRequest::FundingHistory {
            coin: instrument.as_str(),
            start_time: range.start_ms(),
            end_time: range.end_ms(),
        };
        let body = post_json(&self.http, Venue::Hyperliquid, &url, &request).await?;
        parse_history(instrument, body)
    }
}

#[async_trait]
impl FundingSource for HyperliquidClient {
    fn venue(&self) -> Venue {
        Venue::Hyperliquid
    }

    async fn fetch(
        &self,
        instrument: &Instrument,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<VenueSeries, FetchError> {
        let range = TimeRange::for_venue(Venue::Hyperliquid, start, end)?;
        let series = Paginator::new(self).collect(instrument, &range).await?;
        debug!(
            venue = %Venue::Hyperliquid,
            coin = %instrument,
            rows = series.len(),
            dropped = series.dropped(),
            "Fetched funding history"
        );
        Ok(series)
    }
}
