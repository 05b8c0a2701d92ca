//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (intervals, sources, timeouts)
//! - CLI / environment option types
//! - The layered checker configuration and its startup bootstrap

mod bootstrap;
mod constants;
mod layers;
mod types;

// Re-export all constants
pub use bootstrap::{bootstrap, load_override_layer, CommittedConfig};
pub use constants::*;
pub use layers::{
    default_layer, mandatory_layer, merge_layers, CheckerConfig, CliTestingConfig, ConfigLayer,
    HttpCodesConfig, LookupConfig, UserAgentConfig,
};
pub use types::{Config, LogFormat, LogLevel, Sources};
