//! Domain validation errors.
//!
//! Returned by constructors that validate their inputs, such as
//! [`Frequency::new`](super::Frequency::new).

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Resample step must be strictly positive.
    #[error("frequency must be positive, got {millis}ms")]
    NonPositiveFrequency {
        /// The invalid step that was provided.
        millis: i64,
    },

    /// Resample step could not be parsed.
    #[error("invalid frequency '{input}': {reason}")]
    InvalidFrequency {
        /// The text that failed to parse.
        input: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}
