//! Configuration constants.
//!
//! This module defines the constants used throughout the worker: scheduling
//! intervals, download sources, file names and network timeouts.

use std::time::Duration;

/// Environment variable naming the directory under which per-instance
/// workspaces are created.
pub const DATA_DIR_ENV: &str = "PYFUNCEBLE_WORKERS_DATA_DIR";

/// Name of the optional override file, relative to the workspace.
pub const OVERWRITE_CONFIG_FILE: &str = ".PyFunceble.overwrite.yaml";

/// Number of random bytes in a workspace token (16 hex characters).
pub const WORKSPACE_TOKEN_BYTES: usize = 8;

// Scheduling
/// Dataset refresh cadence: 24 hours
pub const DATASET_REFRESH_INTERVAL: Duration = Duration::from_secs(60 * 60 * 24);
/// Geolocation refresh cadence: 70 minutes
pub const LOCATION_REFRESH_INTERVAL: Duration = Duration::from_secs(60 * 70);

// Network operation timeouts
/// Timeout for a single dataset download.
/// Reference lists are a few MB at most, 2 minutes covers slow mirrors.
pub const DATASET_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);
/// Timeout for the geolocation lookup
pub const LOCATION_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// DNS query timeout in seconds
pub const DNS_TIMEOUT_SECS: u64 = 3;
/// WHOIS (port 43) port number
pub const WHOIS_PORT: u16 = 43;
/// Maximum size of a WHOIS response we are willing to buffer (256KB)
pub const MAX_WHOIS_RESPONSE_SIZE: usize = 256 * 1024;
/// Maximum size of a downloaded dataset (64MB)
pub const MAX_DATASET_DOWNLOAD_SIZE: usize = 64 * 1024 * 1024;

// Converter limits
/// Maximum number of addresses produced by the CIDR converter (a /16)
pub const MAX_CIDR_EXPANSION: u64 = 65_536;

// Download sources
/// IANA root zone database (TLD -> WHOIS server)
pub const IANA_DATASET_URL: &str =
    "https://raw.githubusercontent.com/PyFunceble/iana/master/iana-domains-db.json";
/// Public suffix list, grouped by TLD
pub const PUBLIC_SUFFIX_DATASET_URL: &str =
    "https://raw.githubusercontent.com/PyFunceble/public-suffix/master/public-suffix.json";
/// IPv4 reputation list
pub const IPV4_REPUTATION_DATASET_URL: &str = "https://reputation.alienvault.com/reputation.data";
/// User agents, grouped by browser and platform
pub const USER_AGENTS_DATASET_URL: &str =
    "https://raw.githubusercontent.com/PyFunceble/user_agents/master/user_agents.json";
/// Geolocation service
pub const LOCATION_SERVICE_URL: &str = "http://ip-api.com/json";

/// Default User-Agent string for HTTP status probes.
///
/// **Note:** This is a fallback value. The actual User-Agent is picked from the
/// user-agent dataset according to the `user_agent` configuration section.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

// Project links served on `GET /`
pub const PROJECT_REPOSITORY_URL: &str = "https://github.com/PyFunceble/web-worker";
pub const PROJECT_HOME_URL: &str = "https://pyfunceble.github.io";
pub const PROJECT_UPSTREAM_URL: &str = "https://github.com/funilrys/PyFunceble";
pub const SUPPORT_GITHUB_SPONSORS_URL: &str = "https://github.com/sponsors/funilrys";
pub const SUPPORT_PAYPAL_URL: &str = "https://paypal.me/funilrys";
pub const SUPPORT_KOFI_URL: &str = "https://ko-fi.com/V7V3EH2Y";
pub const DOCUMENTATION_URL: &str = "https://pyfunceble.readthedocs.io/en/dev/";
