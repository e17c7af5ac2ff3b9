/*
 * processor.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Resource processor abstraction.
 */

//! Resource processor abstraction.
//!
//! A build applies two chains of [`ResourceProcessor`]s:
//!
//! - the *pre* chain runs on every resource of a group, and on every
//!   resource inlined by import resolution (import-aware processors only)
//! - the *post* chain runs once on the merged content of a group
//!
//! # Example
//!
//! ```ignore
//! use cssbundle_pipeline::{ProcessContext, ResourceProcessor, Result};
//! use cssbundle_core::Resource;
//!
//! struct Uppercase;
//!
//! impl ResourceProcessor for Uppercase {
//!     fn name(&self) -> &str { "uppercase" }
//!
//!     fn process(&self, _ctx: &ProcessContext<'_>, _resource: &Resource, content: &str) -> Result<String> {
//!         Ok(content.to_uppercase())
//!     }
//! }
//! ```

use cssbundle_core::{CorrelationId, ImportContext, ImportMerger, Resource, ResourceType};

use crate::Result;

/// Per-invocation state handed to processors.
#[derive(Clone, Copy)]
pub struct ProcessContext<'a> {
    /// Identifies the group build this call belongs to
    pub correlation_id: CorrelationId,
    /// Collaborator that inlines imported resources
    pub merger: &'a dyn ImportMerger,
}

impl<'a> ProcessContext<'a> {
    pub fn new(correlation_id: CorrelationId, merger: &'a dyn ImportMerger) -> Self {
        Self {
            correlation_id,
            merger,
        }
    }

    /// The import context for the same build.
    pub fn import_context(&self) -> ImportContext<'a> {
        ImportContext::new(self.correlation_id, self.merger)
    }
}

impl std::fmt::Debug for ProcessContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessContext")
            .field("correlation_id", &self.correlation_id)
            .finish_non_exhaustive()
    }
}

/// Trait for resource processors.
///
/// # Thread Safety
///
/// Processors must be `Send + Sync`; groups are built in parallel and share
/// processor instances.
pub trait ResourceProcessor: Send + Sync {
    /// Alias under which the processor is registered.
    ///
    /// Used for logging and error messages.
    fn name(&self) -> &str;

    /// Whether this processor inlines imports.
    ///
    /// Only import-aware processors run on resources reached through
    /// import resolution; the rest of the pre chain runs only on the
    /// resources listed in a group.
    fn is_import_aware(&self) -> bool {
        false
    }

    /// Whether this processor only runs when minimization is enabled.
    fn is_minimize(&self) -> bool {
        false
    }

    /// Whether this processor applies to resources of `kind`.
    fn supports(&self, _kind: ResourceType) -> bool {
        true
    }

    /// Process `content`, the text of `resource`.
    ///
    /// # Errors
    ///
    /// Returns an error if processing fails; the group build fails with it.
    fn process(&self, ctx: &ProcessContext<'_>, resource: &Resource, content: &str)
    -> Result<String>;
}
