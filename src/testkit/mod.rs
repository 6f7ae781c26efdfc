//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Builders for observations, series and time ranges.
//! - [`source`] - Scripted [`FundingSource`](crate::port::FundingSource) and
//!   [`FundingPageSource`](crate::port::FundingPageSource) doubles.

pub mod domain;
pub mod source;
