//! Venue source factory.

use std::sync::Arc;

use tracing::debug;

use crate::adapter::outbound::binance::BinanceClient;
use crate::adapter::outbound::derive::DeriveClient;
use crate::adapter::outbound::hyperliquid::HyperliquidClient;
use crate::infrastructure::config::venue::VenuesConfig;
use crate::port::FundingSource;

/// Build one source per enabled venue, in column order.
pub fn build_sources(venues: &VenuesConfig) -> Vec<Arc<dyn FundingSource>> {
    let mut sources: Vec<Arc<dyn FundingSource>> = Vec::new();
    if venues.hyperliquid.enabled {
        sources.push(Arc::new(HyperliquidClient::from_config(&venues.hyperliquid)));
    }
    if venues.derive.enabled {
        sources.push(Arc::new(DeriveClient::from_config(&venues.derive)));
    }
    if venues.binance.enabled {
        sources.push(Arc::new(BinanceClient::from_config(&venues.binance)));
    }
    debug!(count = sources.len(), "Built venue sources");
    sources
}

/// Hyperliquid client for the predicted-funding snapshot.
///
/// Built from the Hyperliquid settings even when that venue is disabled for
/// history scans.
pub fn build_predicted_client(venues: &VenuesConfig) -> HyperliquidClient {
    HyperliquidClient::from_config(&venues.hyperliquid)
}
