//! Path helpers for config discovery.

use crate::ConfigError;
use std::path::{Path, PathBuf};

/// Canonicalize when possible, passing NotFound paths through unchanged.
pub(super) fn normalize_path(path: &Path) -> Result<PathBuf, ConfigError> {
    match path.canonicalize() {
        Ok(path) => Ok(path),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(err) => Err(ConfigError::ReadFailed(err)),
    }
}

/// Stable key for de-duplicating layers that resolve to the same file.
pub(super) fn unique_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Nearest ancestor of `cwd` containing the marker entry.
pub(super) fn find_project_root(cwd: &Path, marker: &str) -> Option<PathBuf> {
    cwd.ancestors()
        .find(|ancestor| ancestor.join(marker).exists())
        .map(Path::to_path_buf)
}
