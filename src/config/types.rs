//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and process configuration. Every option can also be provided through the
//! environment, which is how the worker is usually deployed.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DATA_DIR_ENV, IANA_DATASET_URL, IPV4_REPUTATION_DATASET_URL, LOCATION_SERVICE_URL,
    PUBLIC_SUFFIX_DATASET_URL, USER_AGENTS_DATASET_URL,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Download sources of the reference datasets and the geolocation service.
///
/// Kept separate from [`Config`] so tests can point every source at a mock
/// server without building a full process configuration.
#[derive(Debug, Clone)]
pub struct Sources {
    pub iana: String,
    pub public_suffix: String,
    pub ipv4_reputation: String,
    pub user_agents: String,
    pub location: String,
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            iana: IANA_DATASET_URL.to_string(),
            public_suffix: PUBLIC_SUFFIX_DATASET_URL.to_string(),
            ipv4_reputation: IPV4_REPUTATION_DATASET_URL.to_string(),
            user_agents: USER_AGENTS_DATASET_URL.to_string(),
            location: LOCATION_SERVICE_URL.to_string(),
        }
    }
}

/// Process configuration.
///
/// Parsed by `clap` from command-line flags and environment variables, but it
/// can also be constructed programmatically.
///
/// # Examples
///
/// ```no_run
/// use funceble_worker::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     data_dir: Some(PathBuf::from("/var/lib/funceble")),
///     port: 8080,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "funceble_worker",
    about = "Serves domain, IP and URL availability, reputation and syntax checks over HTTP."
)]
pub struct Config {
    /// Directory under which the per-instance workspace is created
    #[arg(long, env = DATA_DIR_ENV)]
    pub data_dir: Option<PathBuf>,

    /// Address to bind the HTTP server to
    #[arg(long, env = "WORKER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind the HTTP server to
    #[arg(long, env = "WORKER_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, env = "WORKER_LOG_LEVEL", value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, env = "WORKER_LOG_FORMAT", value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Also write logs to this file
    #[arg(long, env = "WORKER_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Allow WHOIS lookups during availability checks
    #[arg(long, env = "ALLOW_WHOIS_LOOKUP", default_value_t = false)]
    pub allow_whois_lookup: bool,

    /// Let callers decide (through `use_whois_lookup`) whether WHOIS is used
    #[arg(long, env = "ALLOW_WHOIS_LOOKUP_PARAM", default_value_t = false)]
    pub allow_whois_lookup_param: bool,

    /// Origins allowed by CORS (comma-separated). Empty disables CORS.
    #[arg(long, env = "BACKEND_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,

    /// IANA dataset source
    #[arg(long, env = "IANA_DATASET_URL", default_value = IANA_DATASET_URL)]
    pub iana_url: String,

    /// Public suffix dataset source
    #[arg(long, env = "PUBLIC_SUFFIX_DATASET_URL", default_value = PUBLIC_SUFFIX_DATASET_URL)]
    pub public_suffix_url: String,

    /// IPv4 reputation dataset source
    #[arg(long, env = "IPV4_REPUTATION_DATASET_URL", default_value = IPV4_REPUTATION_DATASET_URL)]
    pub ipv4_reputation_url: String,

    /// User agents dataset source
    #[arg(long, env = "USER_AGENTS_DATASET_URL", default_value = USER_AGENTS_DATASET_URL)]
    pub user_agents_url: String,

    /// Geolocation service endpoint
    #[arg(long, env = "LOCATION_SERVICE_URL", default_value = LOCATION_SERVICE_URL)]
    pub location_url: String,
}

impl Config {
    /// Collects the download sources into a [`Sources`] value.
    pub fn sources(&self) -> Sources {
        Sources {
            iana: self.iana_url.clone(),
            public_suffix: self.public_suffix_url.clone(),
            ipv4_reputation: self.ipv4_reputation_url.clone(),
            user_agents: self.user_agents_url.clone(),
            location: self.location_url.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let sources = Sources::default();
        Self {
            data_dir: None,
            host: "127.0.0.1".to_string(),
            port: 8000,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            log_file: None,
            allow_whois_lookup: false,
            allow_whois_lookup_param: false,
            cors_origins: Vec::new(),
            iana_url: sources.iana,
            public_suffix_url: sources.public_suffix,
            ipv4_reputation_url: sources.ipv4_reputation,
            user_agents_url: sources.user_agents,
            location_url: sources.location,
        }
    }
}
