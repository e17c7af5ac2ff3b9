/*
 * traits.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Defines the ResourceLocator trait and the runtime error type.
 */

use std::io;
use std::path::Path;

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors that can occur during runtime operations
#[derive(Debug)]
pub enum RuntimeError {
    /// Standard I/O error
    Io(io::Error),

    /// No resource exists for the given uri (after trying partial names)
    NotFound(String),

    /// The uri cannot be served by this locator (e.g., an http URL)
    NotSupported(String),

    /// The resource is not valid UTF-8
    InvalidUtf8 { uri: String },

    /// SASS compilation failed
    SassError(String),
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeError::Io(e) => write!(f, "I/O error: {}", e),
            RuntimeError::NotFound(uri) => write!(f, "Resource not found: {}", uri),
            RuntimeError::NotSupported(msg) => write!(f, "Operation not supported: {}", msg),
            RuntimeError::InvalidUtf8 { uri } => {
                write!(f, "Resource is not valid UTF-8: {}", uri)
            }
            RuntimeError::SassError(msg) => write!(f, "SASS compilation error: {}", msg),
        }
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RuntimeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RuntimeError {
    fn from(e: io::Error) -> Self {
        RuntimeError::Io(e)
    }
}

/// Source of stylesheet contents.
///
/// `fetch`, `fetch_string` and `exists` take resource uris as they appear
/// in a build (relative paths, absolute paths, `file:` URLs) and apply Sass
/// partial lookup (see [`partial_candidates`]).
///
/// `is_file`, `is_dir` and `read` are exact path queries used by the Sass
/// compiler, which does its own partial lookup.
///
/// # Thread Safety
///
/// Locators are shared by every group of a concurrent build and must be
/// `Send + Sync`.
pub trait ResourceLocator: Send + Sync {
    /// Read the resource at `uri`.
    fn fetch(&self, uri: &str) -> RuntimeResult<Vec<u8>>;

    /// Read the resource at `uri` as UTF-8 text.
    fn fetch_string(&self, uri: &str) -> RuntimeResult<String> {
        let bytes = self.fetch(uri)?;
        String::from_utf8(bytes).map_err(|_| RuntimeError::InvalidUtf8 {
            uri: uri.to_string(),
        })
    }

    /// Check whether `fetch(uri)` would find a resource.
    fn exists(&self, uri: &str) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Read exactly `path`, without partial lookup.
    fn read(&self, path: &Path) -> RuntimeResult<Vec<u8>>;
}

/// Candidate uris for `uri`, in lookup order.
///
/// The uri itself comes first, then the `_` partial in the same directory.
/// When the file name has no extension, `name.scss`, `_name.scss` and
/// `name.css` follow.
///
/// ```
/// use cssbundle_runtime::partial_candidates;
///
/// assert_eq!(
///     partial_candidates("styles/vars"),
///     vec![
///         "styles/vars",
///         "styles/_vars",
///         "styles/vars.scss",
///         "styles/_vars.scss",
///         "styles/vars.css",
///     ]
/// );
/// ```
pub fn partial_candidates(uri: &str) -> Vec<String> {
    let (dir, name) = match uri.rfind(['/', '\\']) {
        Some(idx) => uri.split_at(idx + 1),
        None => ("", uri),
    };

    let mut candidates = vec![uri.to_string()];
    if name.is_empty() {
        return candidates;
    }
    if !name.starts_with('_') {
        candidates.push(format!("{dir}_{name}"));
    }
    if !name.contains('.') {
        candidates.push(format!("{dir}{name}.scss"));
        if !name.starts_with('_') {
            candidates.push(format!("{dir}_{name}.scss"));
        }
        candidates.push(format!("{dir}{name}.css"));
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_candidates_with_extension() {
        assert_eq!(
            partial_candidates("css/main.css"),
            vec!["css/main.css", "css/_main.css"]
        );
    }

    #[test]
    fn test_partial_candidates_already_partial() {
        assert_eq!(
            partial_candidates("_mixins"),
            vec!["_mixins", "_mixins.scss", "_mixins.css"]
        );
    }

    #[test]
    fn test_partial_candidates_directory() {
        assert_eq!(partial_candidates("css/"), vec!["css/"]);
    }

    #[test]
    fn test_runtime_error_display() {
        let err = RuntimeError::NotFound("a.css".to_string());
        assert_eq!(err.to_string(), "Resource not found: a.css");

        let err = RuntimeError::InvalidUtf8 {
            uri: "b.css".to_string(),
        };
        assert_eq!(err.to_string(), "Resource is not valid UTF-8: b.css");
    }

    #[test]
    fn test_io_error_has_source() {
        use std::error::Error;

        let err: RuntimeError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(err.source().is_some());
        assert!(RuntimeError::SassError("x".into()).source().is_none());
    }
}
