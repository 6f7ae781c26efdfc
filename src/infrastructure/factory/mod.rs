//! Factory functions for building infrastructure components.
//!
//! Constructs fully configured venue sources and the refresh monitor from
//! application configuration.
//!
//! # Submodules
//!
//! - [`source`] - Venue funding source construction
//! - [`monitor`] - Refresh monitor construction

pub mod monitor;
pub mod source;

pub use monitor::build_monitor;
pub use source::{build_predicted_client, build_sources};
