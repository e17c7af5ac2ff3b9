/*
 * native.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Filesystem-backed resource locator.
 */

use std::path::{Path, PathBuf};

use url::Url;

use crate::traits::{ResourceLocator, RuntimeError, RuntimeResult, partial_candidates};

/// Locator that reads resources from the local filesystem.
///
/// Relative uris are resolved against the locator's root directory.
/// Absolute paths and `file:` URLs are used as they are. Other URL schemes
/// are rejected with [`RuntimeError::NotSupported`].
#[derive(Debug, Clone)]
pub struct NativeLocator {
    root: PathBuf,
}

impl NativeLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Locator rooted at the current working directory.
    pub fn current_dir() -> RuntimeResult<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a resource uri to a filesystem path.
    pub fn to_path(&self, uri: &str) -> RuntimeResult<PathBuf> {
        // Single-letter schemes are Windows drive letters, not URLs
        if let Ok(url) = Url::parse(uri)
            && url.scheme().len() > 1
        {
            if url.scheme() != "file" {
                return Err(RuntimeError::NotSupported(format!(
                    "cannot read '{}' from the filesystem",
                    uri
                )));
            }
            return url
                .to_file_path()
                .map_err(|()| RuntimeError::NotSupported(format!("invalid file URL '{}'", uri)));
        }
        Ok(self.root.join(uri))
    }

    /// First existing file among the partial candidates of `uri`.
    fn locate(&self, uri: &str) -> RuntimeResult<PathBuf> {
        let path = self.to_path(uri)?;
        let path_str = path.to_string_lossy();
        partial_candidates(&path_str)
            .into_iter()
            .map(PathBuf::from)
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| RuntimeError::NotFound(uri.to_string()))
    }
}

impl ResourceLocator for NativeLocator {
    fn fetch(&self, uri: &str) -> RuntimeResult<Vec<u8>> {
        let path = self.locate(uri)?;
        tracing::trace!(uri, path = %path.display(), "Reading resource");
        Ok(std::fs::read(path)?)
    }

    fn exists(&self, uri: &str) -> bool {
        self.locate(uri).is_ok()
    }

    fn is_file(&self, path: &Path) -> bool {
        self.root.join(path).is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.root.join(path).is_dir()
    }

    fn read(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        Ok(std::fs::read(self.root.join(path))?)
    }
}
