//! Error handling.
//!
//! This module provides the error types of every concern of the worker:
//! - **Initialization**: logger and HTTP client setup
//! - **Configuration**: workspace allocation and configuration bootstrap
//! - **Dataset**: reference dataset downloads and parsing
//! - **Location**: geolocation refresh
//! - **Checker**: request-scoped checker failures
//!
//! Background failures (dataset, location) are logged by their scheduled task
//! and never reach request handlers.

mod types;

// Re-export public API
pub use types::{
    CheckerError, ConfigurationError, DatasetError, InitializationError, LocationError,
};
