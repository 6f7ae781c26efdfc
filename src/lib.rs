//! Fundwatch - cross-venue perpetual funding-rate monitor.
//!
//! Fetches historical funding rates for one asset from several perpetual
//! venues, aligns them onto a common time grid, and ranks the long/short
//! venue pair with the widest spread.
//!
//! # Architecture
//!
//! - [`domain`] - Venue-agnostic types: observations, frames, best pairs
//! - [`port`] - Traits the application needs from the outside world
//! - [`application`] - Pagination, alignment, ranking, statistics and the
//!   refresh monitor
//! - [`adapter`] - Venue HTTP clients (outbound) and the CLI (inbound)
//! - [`infrastructure`] - Configuration loading and component wiring
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use fundwatch::infrastructure::config::Config;
//! use fundwatch::infrastructure::config::scan::ScanOverrides;
//! use fundwatch::infrastructure::factory::build_monitor;
//!
//! # async fn demo() -> fundwatch::error::Result<()> {
//! let config = Config::load("fundwatch.toml")?;
//! let query = config.scan_query(&ScanOverrides::default())?;
//! let outcome = build_monitor(&config).refresh(&query).await?;
//! if let Some(snapshot) = outcome.snapshot() {
//!     println!("{:?}", snapshot.best_pair);
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
