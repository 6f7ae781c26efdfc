use thiserror::Error;

use crate::domain::error::DomainError;
use crate::domain::Venue;

/// Configuration-related errors with structured variants.
///
/// These are caller programming errors: they are never corrected silently
/// and always abort the command that hit them.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

/// Errors raised while retrieving funding history from a venue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Network failure or non-2xx status. Retryable by the caller.
    #[error("{venue} transport error: {reason}")]
    Transport { venue: Venue, reason: String },

    /// The venue answered with a payload that violates its documented schema.
    #[error("{venue} returned an unexpected response: {reason}")]
    ResponseFormat { venue: Venue, reason: String },

    /// The requested window starts after it ends.
    #[error("{venue} invalid range: start {start_ms} > end {end_ms}")]
    InvalidRange {
        venue: Venue,
        start_ms: i64,
        end_ms: i64,
    },

    /// Pagination finished without a single row while data was required.
    #[error("{venue} returned no funding data after {pages} page(s)")]
    PaginationExhausted { venue: Venue, pages: usize },
}

impl FetchError {
    /// Venue the failure belongs to.
    #[must_use]
    pub const fn venue(&self) -> Venue {
        match self {
            Self::Transport { venue, .. }
            | Self::ResponseFormat { venue, .. }
            | Self::InvalidRange { venue, .. }
            | Self::PaginationExhausted { venue, .. } => *venue,
        }
    }

    /// Whether repeating the same request later may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
