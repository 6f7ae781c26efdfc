//! Infrastructure configuration modules.

pub mod logging;
pub mod scan;
pub mod settings;
pub mod venue;

pub use settings::{Config, DEFAULT_CONFIG_PATH};
