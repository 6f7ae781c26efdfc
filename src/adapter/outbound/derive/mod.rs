//! Derive (formerly Lyra) JSON-RPC style funding history.
//!
//! `POST /public/get_funding_rate_history` takes explicit start and end
//! timestamps and answers the whole window in one response.

pub mod client;
pub mod dto;
pub mod settings;

pub use client::DeriveClient;
pub use settings::DeriveSettings;
