//! Hyperliquid info response shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::adapter::outbound::http::{kind, parse_rows};
use crate::adapter::outbound::rate::RawNumber;
use crate::domain::{FundingObservation, Instrument, PredictedFunding, Venue, VenueSeries};
use crate::error::FetchError;

/// Request body for `POST /info`.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InfoRequest<'a> {
    #[serde(rename_all = "camelCase")]
    FundingHistory {
        coin: &'a str,
        start_time: i64,
        end_time: i64,
    },
    PredictedFundings,
}

/// One row of a `fundingHistory` response. `premium` is not used.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingHistoryRow {
    pub time: RawNumber,
    pub funding_rate: RawNumber,
}

impl FundingHistoryRow {
    fn into_observation(self, instrument: &Instrument) -> Option<FundingObservation> {
        Some(FundingObservation::new(
            Venue::Hyperliquid,
            instrument.clone(),
            self.time.to_millis()?,
            self.funding_rate.to_rate()?,
        ))
    }
}

/// Parse one `fundingHistory` page. The body must be a JSON array.
pub fn parse_history(instrument: &Instrument, body: Value) -> Result<VenueSeries, FetchError> {
    let (observations, dropped) = parse_rows(Venue::Hyperliquid, body, |row: FundingHistoryRow| {
        row.into_observation(instrument)
    })?;
    Ok(VenueSeries::new(
        Venue::Hyperliquid,
        instrument.clone(),
        observations,
        dropped,
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PredictedDetails {
    funding_rate: RawNumber,
    next_funding_time: RawNumber,
}

/// Parse `predictedFundings`:
/// `[[asset, [[venue, {fundingRate, nextFundingTime} | null], ...]], ...]`.
///
/// Entries that do not match the shape are skipped. Output is sorted by
/// asset, then venue label.
pub fn parse_predicted(body: Value) -> Result<Vec<PredictedFunding>, FetchError> {
    let Value::Array(entries) = body else {
        return Err(FetchError::ResponseFormat {
            venue: Venue::Hyperliquid,
            reason: format!("expected array, got {}", kind(&body)),
        });
    };

    let mut predictions = Vec::new();
    for entry in entries {
        let Ok((asset, venues)) = serde_json::from_value::<(String, Vec<Value>)>(entry) else {
            continue;
        };
        for venue_entry in venues {
            let Ok((venue, details)) =
                serde_json::from_value::<(String, Option<PredictedDetails>)>(venue_entry)
            else {
                continue;
            };
            let Some(details) = details else {
                continue;
            };
            let (Some(rate), Some(next_funding_time)) = (
                details.funding_rate.to_rate(),
                details.next_funding_time.to_millis(),
            ) else {
                continue;
            };
            predictions.push(PredictedFunding {
                asset: asset.clone(),
                venue,
                rate,
                next_funding_time,
            });
        }
    }

    predictions.sort_by(|a, b| (&a.asset, &a.venue).cmp(&(&b.asset, &b.venue)));
    Ok(predictions)
}
