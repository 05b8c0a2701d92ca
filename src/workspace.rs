//! Per-instance isolated workspace.
//!
//! Every worker process gets its own directory, `<data_dir>/<token>`, where
//! the override file and the downloaded datasets live. The token comes from a
//! CSPRNG so concurrently running instances never share a directory. The
//! directory is removed on shutdown, and on drop if shutdown never ran.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::{DATA_DIR_ENV, WORKSPACE_TOKEN_BYTES};
use crate::error_handling::ConfigurationError;

/// Generates a random workspace token of `2 * WORKSPACE_TOKEN_BYTES` hex characters.
pub fn generate_token() -> String {
    let bytes: [u8; WORKSPACE_TOKEN_BYTES] = rand::random();
    hex::encode(bytes)
}

/// Creates a fresh workspace directory under `base_dir`.
///
/// # Errors
///
/// Returns `ConfigurationError::MissingDataDir` if `base_dir` is `None`, or
/// `ConfigurationError::WorkspaceCreation` if the directory can't be created.
pub fn create_workspace(base_dir: Option<&Path>) -> Result<PathBuf, ConfigurationError> {
    let base_dir = base_dir.ok_or(ConfigurationError::MissingDataDir(DATA_DIR_ENV))?;
    let path = base_dir.join(generate_token());

    std::fs::create_dir_all(&path).map_err(|source| ConfigurationError::WorkspaceCreation {
        path: path.clone(),
        source,
    })?;

    Ok(path)
}

/// Recursively removes a workspace directory. Removing an absent directory
/// is not an error.
pub fn destroy_workspace(path: &Path) -> Result<(), ConfigurationError> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(ConfigurationError::WorkspaceRemoval {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Scoped owner of the workspace directory.
#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
    destroyed: bool,
}

impl Workspace {
    /// Allocates a new workspace under `base_dir`.
    pub fn create(base_dir: Option<&Path>) -> Result<Self, ConfigurationError> {
        let path = create_workspace(base_dir)?;
        log::info!("Workspace created at {}", path.display());
        Ok(Self {
            path,
            destroyed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The token naming this workspace, which also identifies the instance.
    pub fn token(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }

    /// Removes the workspace. Calling it again is a no-op.
    pub fn destroy(&mut self) -> Result<(), ConfigurationError> {
        if self.destroyed {
            return Ok(());
        }
        destroy_workspace(&self.path)?;
        self.destroyed = true;
        log::info!("Workspace {} removed", self.path.display());
        Ok(())
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if let Err(e) = self.destroy() {
            log::error!("{}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    #[test]
    fn test_token_length_and_alphabet() {
        let token = generate_token();
        assert_eq!(token.len(), WORKSPACE_TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_do_not_collide() {
        let tokens: HashSet<String> = (0..5000).map(|_| generate_token()).collect();
        assert_eq!(tokens.len(), 5000);
    }

    #[test]
    fn test_create_requires_base_dir() {
        let result = create_workspace(None);
        assert!(matches!(result, Err(ConfigurationError::MissingDataDir(_))));
    }

    #[test]
    fn test_create_makes_nested_parents() {
        let base = TempDir::new().unwrap();
        let nested = base.path().join("a").join("b");
        let path = create_workspace(Some(&nested)).unwrap();
        assert!(path.is_dir());
        assert_eq!(path.parent(), Some(nested.as_path()));
    }

    #[test]
    fn test_create_fails_when_base_is_a_file() {
        let base = TempDir::new().unwrap();
        let file = base.path().join("not-a-dir");
        std::fs::write(&file, "x").unwrap();

        let result = create_workspace(Some(&file));
        assert!(matches!(
            result,
            Err(ConfigurationError::WorkspaceCreation { .. })
        ));
    }

    #[test]
    fn test_destroy_removes_non_empty_tree_and_is_idempotent() {
        let base = TempDir::new().unwrap();
        let mut workspace = Workspace::create(Some(base.path())).unwrap();
        let path = workspace.path().to_path_buf();
        std::fs::create_dir_all(path.join("nested")).unwrap();
        std::fs::write(path.join("nested").join("iana.json"), "{}").unwrap();

        workspace.destroy().unwrap();
        assert!(!path.exists());
        workspace.destroy().unwrap();
        destroy_workspace(&path).unwrap();
    }

    #[test]
    fn test_drop_removes_workspace() {
        let base = TempDir::new().unwrap();
        let path = {
            let workspace = Workspace::create(Some(base.path())).unwrap();
            workspace.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_token_names_the_directory() {
        let base = TempDir::new().unwrap();
        let workspace = Workspace::create(Some(base.path())).unwrap();
        assert_eq!(workspace.token().len(), WORKSPACE_TOKEN_BYTES * 2);
        assert_eq!(workspace.path(), base.path().join(workspace.token()));
    }
}
