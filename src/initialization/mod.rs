//! Shared resource setup.
//!
//! This module provides functions to initialize the resources shared by the
//! API handlers, the checker and the scheduled refreshes:
//! - Logger
//! - HTTP clients (downloads, status code probes)
//! - DNS resolver
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;
mod resolver;

// Re-export public API
pub use client::{init_client, init_probe_client};
pub use logger::init_logger_with;
pub use resolver::init_resolver;
