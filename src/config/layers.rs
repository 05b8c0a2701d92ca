//! Layered checker configuration.
//!
//! The checker configuration is assembled from three layers applied in order:
//! built-in defaults, the optional on-disk override file, and the mandatory
//! persistent overrides. Layers are YAML mappings merged key-by-key; the
//! result is deserialized into the typed [`CheckerConfig`].

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// One configuration layer: a (possibly nested) YAML mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigLayer(Mapping);

impl ConfigLayer {
    /// An empty layer.
    pub fn empty() -> Self {
        Self(Mapping::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses a layer from YAML text.
    ///
    /// Empty documents and documents whose root is not a mapping yield an
    /// empty layer; only syntactically invalid YAML is an error.
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        match serde_yaml::from_str::<Value>(content)? {
            Value::Mapping(mapping) => Ok(Self(mapping)),
            _ => Ok(Self::empty()),
        }
    }

    /// Builds a layer from any serializable value whose root is a mapping.
    pub fn from_serializable<T: Serialize>(value: &T) -> Result<Self, serde_yaml::Error> {
        match serde_yaml::to_value(value)? {
            Value::Mapping(mapping) => Ok(Self(mapping)),
            _ => Ok(Self::empty()),
        }
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.0
    }

    pub fn into_mapping(self) -> Mapping {
        self.0
    }

    /// Merges `other` on top of `self`; `other` wins on conflicts.
    pub fn merged_with(mut self, other: &ConfigLayer) -> Self {
        deep_merge(&mut self.0, &other.0);
        self
    }
}

impl From<Mapping> for ConfigLayer {
    fn from(mapping: Mapping) -> Self {
        Self(mapping)
    }
}

/// Recursively merges `overlay` into `base`.
///
/// Nested mappings present on both sides are merged; every other value in
/// `overlay` replaces the one in `base`.
fn deep_merge(base: &mut Mapping, overlay: &Mapping) {
    for (key, overlay_value) in overlay {
        if let (Some(Value::Mapping(base_child)), Value::Mapping(overlay_child)) =
            (base.get_mut(key), overlay_value)
        {
            deep_merge(base_child, overlay_child);
            continue;
        }
        base.insert(key.clone(), overlay_value.clone());
    }
}

/// Merges the three configuration layers in their fixed order.
///
/// `mandatory` always takes precedence over `file_override`, which takes
/// precedence over `defaults`.
pub fn merge_layers(
    defaults: &ConfigLayer,
    file_override: &ConfigLayer,
    mandatory: &ConfigLayer,
) -> ConfigLayer {
    defaults
        .clone()
        .merged_with(file_override)
        .merged_with(mandatory)
}

/// Lookup defaults, also used as the defaults of the `/availability` options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Timeout of a single lookup, in seconds
    pub timeout: u64,
    pub dns: bool,
    pub http_status_code: bool,
    pub netinfo: bool,
    pub reputation: bool,
    pub whois: bool,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            timeout: 5,
            dns: true,
            http_status_code: true,
            netinfo: false,
            reputation: false,
            whois: false,
        }
    }
}

/// HTTP status code classification used by the HTTP status lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpCodesConfig {
    pub up: Vec<u16>,
    pub potentially_up: Vec<u16>,
    pub potentially_down: Vec<u16>,
}

impl Default for HttpCodesConfig {
    fn default() -> Self {
        Self {
            up: [100, 101, 102, 103, 200, 201, 202, 203, 204, 205, 206, 207, 208, 226].to_vec(),
            potentially_up: [300, 301, 302, 303, 304, 305, 307, 308, 403, 405, 503].to_vec(),
            potentially_down: [
                400, 401, 402, 404, 406, 407, 408, 409, 410, 411, 412, 413, 414, 415, 416, 417,
                418, 421, 422, 423, 424, 426, 428, 429, 431, 451, 500, 501, 502, 504, 505, 506,
                507, 508, 510, 511,
            ]
            .to_vec(),
        }
    }
}

/// Which user agent the HTTP status lookup sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    pub browser: String,
    pub platform: String,
    /// When set, used verbatim instead of the dataset entry.
    pub custom: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            browser: "chrome".to_string(),
            platform: "linux".to_string(),
            custom: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliTestingConfig {
    /// Keep WHOIS records between requests.
    pub whois_db: bool,
}

/// Typed view of the committed checker configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    pub lookup: LookupConfig,
    pub http_codes: HttpCodesConfig,
    pub user_agent: UserAgentConfig,
    pub cli_testing: CliTestingConfig,
}

/// The base layer: built-in defaults of [`CheckerConfig`].
pub fn default_layer() -> ConfigLayer {
    ConfigLayer::from_serializable(&CheckerConfig::default()).unwrap_or_default()
}

/// Settings that always win over the override file.
///
/// Lookups stay bounded so a request can't hold a blocking worker for long,
/// and WHOIS records are never kept between requests.
pub fn mandatory_layer() -> ConfigLayer {
    let mut lookup = Mapping::new();
    lookup.insert(Value::from("timeout"), Value::from(5u64));

    let mut cli_testing = Mapping::new();
    cli_testing.insert(Value::from("whois_db"), Value::from(false));

    let mut root = Mapping::new();
    root.insert(Value::from("lookup"), Value::Mapping(lookup));
    root.insert(Value::from("cli_testing"), Value::Mapping(cli_testing));
    ConfigLayer(root)
}
