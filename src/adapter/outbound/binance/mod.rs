//! Binance USD-M futures funding history.
//!
//! `GET /fapi/v1/fundingRate` returns at most `limit` (1..=1000) rows per
//! request, so fetches are driven page by page by the
//! [`Paginator`](crate::application::Paginator).

pub mod client;
pub mod dto;
pub mod settings;

pub use client::BinanceClient;
pub use settings::BinanceSettings;
