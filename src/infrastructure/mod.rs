//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without
//! containing business logic: configuration loading and validation, and the
//! factories that wire venue adapters into the refresh monitor.
//!
//! # Submodules
//!
//! - [`config`] - Configuration loading and validation
//! - [`factory`] - Component factory functions

pub mod config;
pub mod factory;
