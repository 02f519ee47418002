//! Configuration schema for ballot comment storage.

use crate::ConfigError;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Config directory under the user's home.
pub const DEFAULT_CONFIG_DIR: &str = ".ballot";
/// Comment directory under [`DEFAULT_CONFIG_DIR`] when no root is configured.
pub const DEFAULT_COMMENTS_DIR: &str = "comments";

/// Root config for ballot tools.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct BallotConfig {
    #[serde(default)]
    pub storage: StorageConfig,
}

impl BallotConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> BallotConfigBuilder {
        BallotConfigBuilder::new()
    }
}

/// Builder for assembling a `BallotConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct BallotConfigBuilder {
    config: BallotConfig,
}

impl BallotConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: BallotConfig::default(),
        }
    }

    /// Replace the storage configuration.
    pub fn storage(mut self, storage: StorageConfig) -> Self {
        self.config.storage = storage;
        self
    }

    /// Set the comment storage root directory.
    pub fn storage_root(mut self, root: impl Into<String>) -> Self {
        self.config.storage.root = Some(root.into());
        self
    }

    /// Finalize and return the built `BallotConfig`.
    pub fn build(self) -> BallotConfig {
        self.config
    }
}

/// Where per-option comment files live.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct StorageConfig {
    /// Directory holding `<option>-comments.txt` files.
    #[serde(default)]
    pub root: Option<String>,
}

impl StorageConfig {
    /// Configured root, or `~/.ballot/comments` when unset.
    pub fn resolved_root(&self) -> Result<PathBuf, ConfigError> {
        if let Some(root) = &self.root {
            return Ok(PathBuf::from(root));
        }
        UserDirs::new()
            .map(|dirs| {
                dirs.home_dir()
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_COMMENTS_DIR)
            })
            .ok_or(ConfigError::NoDefaultRoot)
    }
}
