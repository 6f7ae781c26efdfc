//! Outbound adapters (driven side): one funding source per venue.

pub mod binance;
pub mod derive;
pub mod http;
pub mod hyperliquid;
pub mod rate;
