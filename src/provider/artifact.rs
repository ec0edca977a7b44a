//! Artifact resolution and reading.

use std::path::{Path, PathBuf};

use crate::error::ProviderError;

/// Maps a `fileLocation` string to bytes on durable storage. No caching —
/// every call re-reads.
pub trait ArtifactProvider {
    /// Resolves `location` to a filesystem path without touching the disk.
    fn resolve(&self, location: &str) -> Result<PathBuf, ProviderError>;

    /// Reads the entire artifact at `path`.
    fn read(&self, path: &Path) -> Result<Vec<u8>, ProviderError>;
}

/// Reads artifacts directly off the local filesystem. When constructed
/// with a `root`, `resolve` rejects any location that canonicalizes
/// outside it; without one, resolution is the identity mapping the
/// default contract describes.
pub struct LocalArtifactProvider {
    root: Option<PathBuf>,
}

impl LocalArtifactProvider {
    /// An unconfined provider: any path the caller supplies is trusted.
    #[must_use]
    pub fn new() -> Self {
        Self { root: None }
    }

    /// A provider confined to `root`: `resolve` fails for any location
    /// that canonicalizes outside it.
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self { root: Some(root) }
    }
}

impl Default for LocalArtifactProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactProvider for LocalArtifactProvider {
    fn resolve(&self, location: &str) -> Result<PathBuf, ProviderError> {
        let path = PathBuf::from(location);
        let Some(root) = &self.root else {
            return Ok(path);
        };
        let canonical_root = root
            .canonicalize()
            .map_err(|source| ProviderError::Io { path: root.display().to_string(), source })?;
        let canonical_path = path
            .canonicalize()
            .map_err(|_| ProviderError::NotFound(location.to_string()))?;
        if canonical_path.starts_with(&canonical_root) {
            Ok(canonical_path)
        } else {
            Err(ProviderError::PathEscapesRoot(location.to_string()))
        }
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, ProviderError> {
        std::fs::read(path).map_err(|source| ProviderError::Io { path: path.display().to_string(), source })
    }
}
