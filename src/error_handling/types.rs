//! Error type definitions.
//!
//! This module defines all error types used throughout the worker.

use std::path::PathBuf;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the logger with custom message (e.g., file creation).
    #[error("Logger initialization error: {0}")]
    LoggerSetupError(String),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// No tokio runtime was available when one was required.
    #[error("Runtime initialization error: {0}")]
    RuntimeError(String),
}

/// Error types for workspace and configuration setup.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// The base data directory was not provided.
    #[error("Could not find the {0} environment variable")]
    MissingDataDir(&'static str),

    /// The workspace directory could not be created.
    #[error("Failed to create workspace {path}: {source}")]
    WorkspaceCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The workspace directory could not be removed.
    #[error("Failed to remove workspace {path}: {source}")]
    WorkspaceRemoval {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The merged configuration doesn't fit the typed configuration.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Error types for reference dataset downloads and loading.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// Transport-level failure.
    #[error("Failed to download {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: ReqwestError,
    },

    /// The server answered with a non-success status.
    #[error("Failed to download {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    /// The payload exceeded the download size limit.
    #[error("Dataset from {url} too large: {size} bytes (max: {max} bytes)")]
    TooLarge { url: String, size: usize, max: usize },

    /// Writing or reading the dataset file failed.
    #[error("Dataset file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dataset file content could not be parsed.
    #[error("Failed to parse dataset {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// No runtime is available to drive a lazy download.
    #[error("No async runtime available to download {0}")]
    NoRuntime(String),
}

/// Error types for the geolocation refresh.
#[derive(Error, Debug)]
pub enum LocationError {
    /// Transport-level failure.
    #[error("Location request failed: {0}")]
    Request(#[from] ReqwestError),

    /// The service answered with something other than 200.
    #[error("Could not fetch location information. (status_code: {0})")]
    UnexpectedStatus(u16),

    /// The body wasn't a JSON object matching the location record.
    #[error("Invalid location payload: {0}")]
    Payload(String),
}

/// Error types surfaced by checker backends.
#[derive(Error, Debug)]
pub enum CheckerError {
    /// The subject was empty after trimming.
    #[error("The subject to work with is empty")]
    EmptySubject,

    /// A converter input was rejected.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A dataset required by the check was unavailable.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}
