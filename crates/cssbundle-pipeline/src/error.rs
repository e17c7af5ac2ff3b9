//! Error types for the build pipeline.
//!
//! Copyright (c) 2025 Posit, PBC

use std::path::PathBuf;

use cssbundle_core::ImportError;
use cssbundle_runtime::RuntimeError;
use thiserror::Error;

/// Errors that can occur while building stylesheet groups
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Import resolution failed
    #[error(transparent)]
    Import(#[from] ImportError),

    /// Reading a resource failed
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// A configured processor alias is not registered
    #[error("Unknown processor '{alias}'")]
    UnknownProcessor { alias: String },

    /// A requested group is not defined in the configuration
    #[error("Unknown group '{0}'")]
    UnknownGroup(String),

    /// The project configuration is unreadable or invalid
    #[error("Invalid configuration {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    /// A processor failed on a resource
    #[error("Processor '{processor}' failed on {uri}: {message}")]
    Processor {
        processor: String,
        uri: String,
        message: String,
    },
}

impl PipelineError {
    /// Convert into an [`ImportError`] for reporting back through the
    /// import merger. Import errors pass through unchanged so the innermost
    /// failure is what the top-level build reports.
    pub fn into_import_error(self, uri: &str) -> ImportError {
        match self {
            PipelineError::Import(e) => e,
            other => ImportError::Merge {
                uri: uri.to_string(),
                message: other.to_string(),
            },
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_errors_pass_through() {
        let err = PipelineError::Import(ImportError::Fetch {
            uri: "a.css".to_string(),
            message: "gone".to_string(),
        });
        assert!(matches!(
            err.into_import_error("main.css"),
            ImportError::Fetch { ref uri, .. } if uri == "a.css"
        ));
    }

    #[test]
    fn test_other_errors_become_merge_errors() {
        let err = PipelineError::Processor {
            processor: "scss".to_string(),
            uri: "a.scss".to_string(),
            message: "undefined variable".to_string(),
        };
        let converted = err.into_import_error("a.scss");
        assert_eq!(converted.uri(), Some("a.scss"));
        assert!(converted.to_string().contains("undefined variable"));
    }

    #[test]
    fn test_config_error_display() {
        let err = PipelineError::Config {
            path: PathBuf::from("_cssbundle.yml"),
            message: "duplicate group 'site'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid configuration _cssbundle.yml: duplicate group 'site'"
        );
    }
}
