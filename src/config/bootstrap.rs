//! Configuration bootstrap.
//!
//! Merges the defaults, the optional override file found in the workspace and
//! the mandatory persistent overrides, then commits the result once.

use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::config::constants::OVERWRITE_CONFIG_FILE;
use crate::config::layers::{
    default_layer, mandatory_layer, merge_layers, CheckerConfig, ConfigLayer,
};
use crate::error_handling::ConfigurationError;

/// The configuration committed at startup.
///
/// Built once by [`bootstrap`] and shared behind an `Arc` for the lifetime
/// of the process.
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedConfig {
    tree: Mapping,
    checker: CheckerConfig,
}

impl CommittedConfig {
    /// Commits a merged layer, validating it against the typed view.
    pub fn commit(merged: ConfigLayer) -> Result<Self, ConfigurationError> {
        let tree = merged.into_mapping();
        let checker: CheckerConfig = serde_yaml::from_value(Value::Mapping(tree.clone()))
            .map_err(|e| ConfigurationError::Invalid(e.to_string()))?;
        Ok(Self { tree, checker })
    }

    /// The full merged tree, including keys the worker doesn't interpret.
    pub fn tree(&self) -> &Mapping {
        &self.tree
    }

    pub fn checker(&self) -> &CheckerConfig {
        &self.checker
    }
}

impl Default for CommittedConfig {
    fn default() -> Self {
        Self {
            tree: default_layer().merged_with(&mandatory_layer()).into_mapping(),
            checker: CheckerConfig::default(),
        }
    }
}

/// Reads the override layer from the workspace.
///
/// A missing, empty or malformed file yields an empty layer. Malformed
/// content is logged since silently discarding it hides operator mistakes.
pub fn load_override_layer(workspace: &Path) -> ConfigLayer {
    let path = workspace.join(OVERWRITE_CONFIG_FILE);
    if !path.exists() {
        log::debug!("No override file at {}", path.display());
        return ConfigLayer::empty();
    }

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            log::warn!(
                "Failed to read override file {}: {}. Ignoring it.",
                path.display(),
                e
            );
            return ConfigLayer::empty();
        }
    };

    match ConfigLayer::from_yaml_str(&content) {
        Ok(layer) => {
            if layer.is_empty() {
                log::debug!("Override file {} is empty", path.display());
            } else {
                log::info!("Loaded override file {}", path.display());
            }
            layer
        }
        Err(e) => {
            log::warn!(
                "Malformed override file {}: {}. Ignoring it.",
                path.display(),
                e
            );
            ConfigLayer::empty()
        }
    }
}

/// Bootstraps the checker configuration for the given workspace.
///
/// # Errors
///
/// Returns `ConfigurationError::Invalid` if the merged tree doesn't fit the
/// typed configuration (e.g. `lookup.timeout: "soon"`).
pub fn bootstrap(workspace: &Path) -> Result<CommittedConfig, ConfigurationError> {
    let file_override = load_override_layer(workspace);
    let merged = merge_layers(&default_layer(), &file_override, &mandatory_layer());
    let committed = CommittedConfig::commit(merged)?;

    log::info!(
        "Committed configuration (lookup timeout: {}s, whois db: {})",
        committed.checker().lookup.timeout,
        committed.checker().cli_testing.whois_db
    );

    Ok(committed)
}
