/*
 * memory.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * In-memory resource locator.
 */

use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};

use url::Url;

use crate::traits::{ResourceLocator, RuntimeError, RuntimeResult, partial_candidates};

/// Locator backed by an in-memory map of files.
///
/// Paths are normalized (`.` and `..` resolved, relative paths anchored at
/// the root directory, `/project` by default), so `styles/./a.css` and
/// `/project/styles/a.css` name the same file. Parent directories of every
/// file are tracked so the Sass compiler can probe load paths.
#[derive(Debug, Clone)]
pub struct MemoryLocator {
    /// File contents, keyed by normalized absolute path
    files: HashMap<PathBuf, Vec<u8>>,
    /// Directory entries (automatically includes parents of all files)
    directories: HashSet<PathBuf>,
    root: PathBuf,
}

impl Default for MemoryLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLocator {
    pub fn new() -> Self {
        Self::with_root(PathBuf::from("/project"))
    }

    /// Create a locator that anchors relative paths at `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let mut locator = Self {
            files: HashMap::new(),
            directories: HashSet::new(),
            root: PathBuf::from("/"),
        };
        let root = locator.normalize(&root.into());
        locator.add_directory_and_parents(&root);
        locator.root = root;
        locator
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_file(mut self, uri: impl AsRef<Path>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(uri, contents);
        self
    }

    /// Add or replace a file, creating its parent directories.
    pub fn insert(&mut self, uri: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        let normalized = self.normalize(uri.as_ref());
        if let Some(parent) = normalized.parent() {
            self.add_directory_and_parents(parent);
        }
        self.files.insert(normalized, contents.into());
    }

    /// Remove a file. Returns true if it existed.
    pub fn remove(&mut self, uri: impl AsRef<Path>) -> bool {
        let normalized = self.normalize(uri.as_ref());
        self.files.remove(&normalized).is_some()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Normalize `path` to an absolute path under the root.
    pub fn normalize(&self, path: &Path) -> PathBuf {
        let text = path.to_string_lossy().replace('\\', "/");
        let path = Path::new(&text);
        let absolute = if path.has_root() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };

        let mut normalized = PathBuf::new();
        for component in absolute.components() {
            match component {
                Component::ParentDir => {
                    if !normalized.pop() {
                        // Can't go above root
                        normalized.push("/");
                    }
                }
                Component::CurDir => {}
                other => normalized.push(other),
            }
        }
        if normalized.as_os_str().is_empty() {
            normalized.push("/");
        }
        normalized
    }

    fn add_directory_and_parents(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }

    fn uri_to_path(&self, uri: &str) -> RuntimeResult<PathBuf> {
        if let Ok(url) = Url::parse(uri)
            && url.scheme().len() > 1
        {
            return match url.scheme() {
                "file" => Ok(self.normalize(Path::new(url.path()))),
                _ => Err(RuntimeError::NotSupported(format!(
                    "cannot read '{}' from memory",
                    uri
                ))),
            };
        }
        Ok(self.normalize(Path::new(uri)))
    }

    fn locate(&self, uri: &str) -> RuntimeResult<&Vec<u8>> {
        let path = self.uri_to_path(uri)?;
        partial_candidates(&path.to_string_lossy())
            .iter()
            .find_map(|candidate| self.files.get(Path::new(candidate)))
            .ok_or_else(|| RuntimeError::NotFound(uri.to_string()))
    }
}

impl ResourceLocator for MemoryLocator {
    fn fetch(&self, uri: &str) -> RuntimeResult<Vec<u8>> {
        self.locate(uri).cloned()
    }

    fn exists(&self, uri: &str) -> bool {
        self.locate(uri).is_ok()
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(&self.normalize(path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.directories.contains(&self.normalize(path))
    }

    fn read(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        self.files
            .get(&self.normalize(path))
            .cloned()
            .ok_or_else(|| RuntimeError::NotFound(path.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_normalized() {
        let locator = MemoryLocator::new().with_file("styles/./main.css", ".a {}");

        assert!(locator.exists("styles/main.css"));
        assert!(locator.exists("/project/styles/main.css"));
        assert!(locator.exists("styles/sub/../main.css"));
        assert!(locator.exists("styles\\main.css"));
        assert_eq!(locator.fetch_string("styles/main.css").unwrap(), ".a {}");
    }

    #[test]
    fn test_directories_are_tracked() {
        let locator = MemoryLocator::new().with_file("a/b/c.scss", "");
        assert!(locator.is_dir(Path::new("a")));
        assert!(locator.is_dir(Path::new("a/b")));
        assert!(locator.is_dir(Path::new("/project")));
        assert!(!locator.is_dir(Path::new("a/b/c.scss")));
        assert!(locator.is_file(Path::new("a/b/c.scss")));
    }

    #[test]
    fn test_partial_lookup() {
        let locator = MemoryLocator::new().with_file("scss/_mixins.scss", "@mixin m {}");
        assert_eq!(
            locator.fetch_string("scss/mixins").unwrap(),
            "@mixin m {}"
        );
        // Exact reads do not apply partial lookup
        assert!(locator.read(Path::new("scss/mixins")).is_err());
    }

    #[test]
    fn test_custom_root() {
        let locator = MemoryLocator::with_root("/site").with_file("a.css", ".a {}");
        assert!(locator.exists("/site/a.css"));
        assert!(!locator.exists("/project/a.css"));
        assert_eq!(locator.root(), Path::new("/site"));
    }

    #[test]
    fn test_remove() {
        let mut locator = MemoryLocator::new().with_file("a.css", ".a {}");
        assert_eq!(locator.len(), 1);
        assert!(locator.remove("a.css"));
        assert!(!locator.remove("a.css"));
        assert!(locator.is_empty());
    }

    #[test]
    fn test_file_url_and_unsupported_scheme() {
        let locator = MemoryLocator::new().with_file("a.css", ".a {}");
        assert!(locator.exists("file:///project/a.css"));

        let err = locator.fetch("http://example.com/a.css").unwrap_err();
        assert!(matches!(err, RuntimeError::NotSupported(_)));
    }
}
