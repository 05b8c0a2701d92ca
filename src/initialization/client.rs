//! HTTP client initialization.
//!
//! This module provides the two HTTP clients of the worker: one for dataset
//! downloads and the geolocation lookup, one for HTTP status code probes.

use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::DEFAULT_USER_AGENT;

/// Initializes the client used for dataset downloads and geolocation.
///
/// Redirects are followed. Requests carry their own timeouts, so the client
/// only bounds connection establishment.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client() -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .connect_timeout(Duration::from_secs(10))
        .user_agent(concat!("funceble_worker/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Initializes the client used for HTTP status code probes.
///
/// Redirects are disabled so the probe sees the status code the subject
/// itself answers with. The User-Agent is set per request.
///
/// # Arguments
///
/// * `timeout` - Overall timeout of a probe
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_probe_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(timeout)
        .user_agent(DEFAULT_USER_AGENT)
        .build()
}
