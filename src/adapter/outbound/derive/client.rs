//! Derive REST client.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client as HttpClient;
use tracing::debug;

use super::dto::{parse_history, FundingHistoryRequest};
use super::settings::DeriveSettings;
use crate::adapter::outbound::http::{endpoint, post_json};
use crate::domain::{Instrument, TimeRange, Venue, VenueSeries};
use crate::error::FetchError;
use crate::port::FundingSource;

const HISTORY_PATH: &str = "/public/get_funding_rate_history";

pub struct DeriveClient {
    http: HttpClient,
    base_url: String,
    period: Option<u32>,
}

impl DeriveClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::from_config(&DeriveSettings {
            base_url: base_url.into(),
            ..DeriveSettings::default()
        })
    }

    #[must_use]
    pub fn from_config(settings: &DeriveSettings) -> Self {
        Self {
            http: settings.http().build_client(),
            base_url: settings.base_url.clone(),
            period: settings.period,
        }
    }
}

#[async_trait]
impl FundingSource for DeriveClient {
    fn venue(&self) -> Venue {
        Venue::Derive
    }

    async fn fetch(
        &self,
        instrument: &Instrument,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<VenueSeries, FetchError> {
        let range = TimeRange::for_venue(Venue::Derive, start, end)?;
        let request = FundingHistoryRequest {
            instrument_name: instrument.as_str(),
            start_timestamp: range.start_ms(),
            end_timestamp: range.end_ms(),
            period: self.period.map(|period| period.to_string()),
        };
        let url = endpoint(&self.base_url, HISTORY_PATH);
        let body = post_json(&self.http, Venue::Derive, &url, &request).await?;
        let series = parse_history(instrument, body)?;
        debug!(
            venue = %Venue::Derive,
            instrument = %instrument,
            rows = series.len(),
            dropped = series.dropped(),
            "Fetched funding history"
        );
        Ok(series)
    }
}
