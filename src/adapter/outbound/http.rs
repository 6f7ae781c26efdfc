//! Shared HTTP plumbing for the venue adapters.
//!
//! Network failures and non-2xx statuses become [`FetchError::Transport`];
//! bodies that are not JSON, or not the expected top-level shape, become
//! [`FetchError::ResponseFormat`]. Nothing here retries.

use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{FundingObservation, Venue};
use crate::error::{ConfigError, FetchError};

/// Timeouts for one venue's HTTP client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HttpSettings {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

const fn default_timeout_ms() -> u64 {
    5_000
}

const fn default_connect_timeout_ms() -> u64 {
    3_000
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

impl HttpSettings {
    pub fn validate(&self, timeout_field: &'static str, connect_field: &'static str) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: timeout_field,
                reason: "must be greater than 0".into(),
            });
        }
        if self.connect_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: connect_field,
                reason: "must be greater than 0".into(),
            });
        }
        Ok(())
    }

    /// Build a client with these timeouts, falling back to defaults.
    #[must_use]
    pub fn build_client(&self) -> HttpClient {
        HttpClient::builder()
            .timeout(Duration::from_millis(self.timeout_ms))
            .connect_timeout(Duration::from_millis(self.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            })
    }
}

/// Validate a configured base URL.
pub fn validate_base_url(field: &'static str, base_url: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(base_url).map_err(|err| ConfigError::InvalidValue {
        field,
        reason: err.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    Ok(())
}

/// Join a base URL and an absolute path without doubling the slash.
#[must_use]
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

pub async fn get_json(
    http: &HttpClient,
    venue: Venue,
    url: &str,
    query: &[(&str, String)],
) -> Result<Value, FetchError> {
    debug!(venue = %venue, url, "GET");
    let response = http
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|err| transport(venue, &err))?;
    read_json(venue, response).await
}

pub async fn post_json<B>(http: &HttpClient, venue: Venue, url: &str, body: &B) -> Result<Value, FetchError>
where
    B: Serialize + ?Sized,
{
    debug!(venue = %venue, url, "POST");
    let response = http
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(|err| transport(venue, &err))?;
    read_json(venue, response).await
}

async fn read_json(venue: Venue, response: reqwest::Response) -> Result<Value, FetchError> {
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Transport {
            venue,
            reason: format!("HTTP {status}"),
        });
    }
    let bytes = response.bytes().await.map_err(|err| transport(venue, &err))?;
    serde_json::from_slice(&bytes).map_err(|err| FetchError::ResponseFormat {
        venue,
        reason: format!("invalid JSON: {err}"),
    })
}

fn transport(venue: Venue, err: &reqwest::Error) -> FetchError {
    FetchError::Transport {
        venue,
        reason: err.to_string(),
    }
}

/// Name of a JSON value's type, for error messages.
#[must_use]
pub fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Convert every element of a JSON array into an observation.
///
/// Elements that fail to deserialize into `T`, or that `convert` rejects,
/// are dropped and counted. A non-array `rows` is a format error.
pub fn parse_rows<T, F>(
    venue: Venue,
    rows: Value,
    convert: F,
) -> Result<(Vec<FundingObservation>, usize), FetchError>
where
    T: DeserializeOwned,
    F: Fn(T) -> Option<FundingObservation>,
{
    let Value::Array(rows) = rows else {
        return Err(FetchError::ResponseFormat {
            venue,
            reason: format!("expected array, got {}", kind(&rows)),
        });
    };

    let total = rows.len();
    let observations: Vec<FundingObservation> = rows
        .into_iter()
        .filter_map(|row| serde_json::from_value::<T>(row).ok())
        .filter_map(convert)
        .collect();
    let dropped = total - observations.len();
    if dropped > 0 {
        debug!(venue = %venue, dropped, total, "Skipped malformed funding rows");
    }
    Ok((observations, dropped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// Answer a single request with `status` and a plain-text `body`.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            read_request(&mut stream).await;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            let _ = stream.shutdown().await;
        });
        format!("http://{addr}")
    }

    async fn read_request(stream: &mut TcpStream) {
        let mut received = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                return;
            }
            received.extend_from_slice(&chunk[..n]);
            let Some(head_end) = received.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&received[..head_end]).to_ascii_lowercase();
            let body_len = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if received.len() >= head_end + 4 + body_len {
                return;
            }
        }
    }

    fn client() -> HttpClient {
        HttpClient::builder().no_proxy().build().unwrap()
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        assert_eq!(
            endpoint("https://fapi.binance.com/", "/fapi/v1/fundingRate"),
            "https://fapi.binance.com/fapi/v1/fundingRate"
        );
        assert_eq!(endpoint("http://localhost:8080", "/info"), "http://localhost:8080/info");
    }

    #[test]
    fn base_url_must_be_http() {
        assert!(validate_base_url("venues.binance.base_url", "https://fapi.binance.com").is_ok());
        assert!(matches!(
            validate_base_url("venues.binance.base_url", "not a url"),
            Err(ConfigError::InvalidValue { field: "venues.binance.base_url", .. })
        ));
        assert!(validate_base_url("venues.binance.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn zero_timeouts_are_rejected() {
        let settings = HttpSettings {
            timeout_ms: 0,
            connect_timeout_ms: 100,
        };
        assert!(matches!(
            settings.validate("t", "c"),
            Err(ConfigError::InvalidValue { field: "t", .. })
        ));
        assert!(HttpSettings::default().validate("t", "c").is_ok());
    }

    #[tokio::test]
    async fn non_success_status_is_transport_error() {
        let base = serve_once("503 Service Unavailable", "busy").await;
        let err = get_json(&client(), Venue::Binance, &endpoint(&base, "/fapi/v1/fundingRate"), &[])
            .await
            .unwrap_err();
        match err {
            FetchError::Transport { venue, reason } => {
                assert_eq!(venue, Venue::Binance);
                assert!(reason.contains("503"), "{reason}");
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_body_is_format_error() {
        let base = serve_once("200 OK", "not json").await;
        let body = serde_json::json!({"type": "fundingHistory"});
        let err = post_json(&client(), Venue::Hyperliquid, &endpoint(&base, "/info"), &body)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FetchError::ResponseFormat {
                venue: Venue::Hyperliquid,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn json_body_is_returned() {
        let base = serve_once("200 OK", "[1,2]").await;
        let value = get_json(&client(), Venue::Derive, &base, &[("limit", "2".to_string())])
            .await
            .unwrap();
        assert_eq!(value, serde_json::json!([1, 2]));
    }
}
