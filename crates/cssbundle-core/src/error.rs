//! Error types for import resolution.
//!
//! Copyright (c) 2025 Posit, PBC

use thiserror::Error;

/// Errors that can occur while resolving imports
#[derive(Debug, Error)]
pub enum ImportError {
    /// The resource handed to the resolver has no uri
    #[error("Cannot resolve imports of a resource without a uri")]
    MissingUri,

    /// An imported resource could not be fetched
    #[error("Failed to fetch imported resource {uri}: {message}")]
    Fetch { uri: String, message: String },

    /// The merge collaborator failed while processing an imported resource
    #[error("Failed to merge imported resource {uri}: {message}")]
    Merge { uri: String, message: String },
}

impl ImportError {
    /// The uri the error refers to, if any.
    pub fn uri(&self) -> Option<&str> {
        match self {
            ImportError::MissingUri => None,
            ImportError::Fetch { uri, .. } | ImportError::Merge { uri, .. } => Some(uri),
        }
    }
}
