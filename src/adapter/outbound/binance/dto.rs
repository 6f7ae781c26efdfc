//! Binance funding-rate response rows.

use serde::Deserialize;
use serde_json::Value;

use crate::adapter::outbound::http::parse_rows;
use crate::adapter::outbound::rate::RawNumber;
use crate::domain::{FundingObservation, Instrument, Venue, VenueSeries};
use crate::error::FetchError;

/// One row of `GET /fapi/v1/fundingRate`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingRateRow {
    pub funding_time: RawNumber,
    pub funding_rate: RawNumber,
}

impl FundingRateRow {
    fn into_observation(self, instrument: &Instrument) -> Option<FundingObservation> {
        Some(FundingObservation::new(
            Venue::Binance,
            instrument.clone(),
            self.funding_time.to_millis()?,
            self.funding_rate.to_rate()?,
        ))
    }
}

/// Parse one page. The body must be a JSON array.
pub fn parse_page(instrument: &Instrument, body: Value) -> Result<VenueSeries, FetchError> {
    let (observations, dropped) = parse_rows(Venue::Binance, body, |row: FundingRateRow| {
        row.into_observation(instrument)
    })?;
    Ok(VenueSeries::new(
        Venue::Binance,
        instrument.clone(),
        observations,
        dropped,
    ))
}
