//! Hyperliquid info endpoint.
//!
//! `POST /info` serves both hourly funding history (`fundingHistory`, capped
//! at 500 rows per response and therefore paginated) and the cross-venue
//! predicted funding snapshot (`predictedFundings`).

pub mod client;
pub mod dto;
pub mod settings;

pub use client::HyperliquidClient;
pub use settings::HyperliquidSettings;
