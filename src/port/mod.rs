//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points of the crate: venue adapters implement
//! them, the application layer drives them.
//!
//! ```text
//!        ┌──────────────────────────────┐
//!        │         Application          │
//!        │  paginator · aligner · rank  │
//!        └──────────────┬───────────────┘
//!                       │ FundingSource / FundingPageSource
//!        ┌──────────────┼───────────────┐
//!        ▼              ▼               ▼
//!   ┌─────────┐   ┌───────────┐   ┌─────────┐
//!   │ Binance │   │Hyperliquid│   │ Derive  │
//!   └─────────┘   └───────────┘   └─────────┘
//! ```

pub mod outbound;

pub use outbound::funding::{FundingPageSource, FundingSource};
