//! Derive funding history request and response shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::adapter::outbound::http::{kind, parse_rows};
use crate::adapter::outbound::rate::RawNumber;
use crate::domain::{FundingObservation, Instrument, Venue, VenueSeries};
use crate::error::FetchError;

/// Body of `POST /public/get_funding_rate_history`.
#[derive(Debug, Serialize)]
pub struct FundingHistoryRequest<'a> {
    pub instrument_name: &'a str,
    pub start_timestamp: i64,
    pub end_timestamp: i64,
    /// Sent as a string enum (`"3600"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FundingHistoryRow {
    pub timestamp: RawNumber,
    pub funding_rate: RawNumber,
}

impl FundingHistoryRow {
    fn into_observation(self, instrument: &Instrument) -> Option<FundingObservation> {
        Some(FundingObservation::new(
            Venue::Derive,
            instrument.clone(),
            self.timestamp.to_millis()?,
            self.funding_rate.to_rate()?,
        ))
    }
}

/// Parse `{"result": {"funding_rate_history": [...]}}`.
///
/// A missing or null history is an empty series. A venue-reported `error`,
/// a non-object body, or a non-array history is a format error.
pub fn parse_history(instrument: &Instrument, body: Value) -> Result<VenueSeries, FetchError> {
    let Value::Object(mut body) = body else {
        return Err(format_error(format!("expected object, got {}", kind(&body))));
    };

    if let Some(error) = body.get("error").filter(|e| !e.is_null()) {
        return Err(format_error(format!("venue error: {error}")));
    }

    let history = match body.remove("result") {
        None | Some(Value::Null) => Value::Null,
        Some(Value::Object(mut result)) => result
            .remove("funding_rate_history")
            .unwrap_or(Value::Null),
        Some(other) => {
            return Err(format_error(format!(
                "expected result object, got {}",
                kind(&other)
            )))
        }
    };

    if history.is_null() {
        return Ok(VenueSeries::empty(Venue::Derive, instrument.clone()));
    }

    let (observations, dropped) = parse_rows(Venue::Derive, history, |row: FundingHistoryRow| {
        row.into_observation(instrument)
    })?;
    Ok(VenueSeries::new(
        Venue::Derive,
        instrument.clone(),
        observations,
        dropped,
    ))
}

fn format_error(reason: String) -> FetchError {
    FetchError::ResponseFormat {
        venue: Venue::Derive,
        reason,
    }
}
