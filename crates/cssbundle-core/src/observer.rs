/*
 * observer.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Observer hooks for import resolution events.
 */

//! Observer abstraction for import resolution events.
//!
//! The resolver reports what it finds through [`ImportObserver`] so that
//! hosts can log, count or surface diagnostics without the resolver
//! depending on any of that.

use crate::resource::Resource;

/// Observer for import resolution events.
///
/// All methods have empty default implementations, allowing observers
/// to implement only the events they care about.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; one resolver is shared by every
/// concurrent build.
pub trait ImportObserver: Send + Sync {
    /// Called for each distinct import found in a stylesheet.
    fn on_import_detected(&self, _import: &Resource) {}

    /// Called when a resource is reached again within the same build and its
    /// content is skipped.
    fn on_recursive_import(&self, _resource: &Resource) {}

    /// Called when a stylesheet imports the same resource more than once.
    fn on_duplicate_import(&self, _import: &Resource) {}
}

/// No-op observer implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ImportObserver for NoopObserver {}

/// Observer that emits `tracing` events.
///
/// This is the default observer of [`ImportResolver`](crate::ImportResolver).
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ImportObserver for TracingObserver {
    fn on_import_detected(&self, import: &Resource) {
        tracing::trace!(uri = %import, kind = %import.kind(), "Import detected");
    }

    fn on_recursive_import(&self, resource: &Resource) {
        tracing::warn!(uri = %resource, "Recursive import detected, skipping");
    }

    fn on_duplicate_import(&self, import: &Resource) {
        tracing::warn!(uri = %import, "Duplicate imported resource, keeping the first");
    }
}
