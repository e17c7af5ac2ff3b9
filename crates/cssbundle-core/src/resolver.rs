/*
 * resolver.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Recursive import resolution.
 */

//! The recursive import resolver.
//!
//! [`ImportResolver::process`] turns one stylesheet into a flattened one:
//!
//! 1. `@use` directives are rewritten into `@import` (see [`rewrite_use_directives`])
//! 2. The resource is checked against the build's session; a resource seen
//!    before in the same build contributes nothing
//! 3. An import frame is entered for the resource
//! 4. Import locators are discovered and resolved against the resource uri
//! 5. The [`ImportMerger`] fetches and processes the imports, which usually
//!    re-enters this resolver with the same correlation id
//! 6. The merged imports are followed by the local body with its import
//!    statements removed
//!
//! The frame entered in step 3 is an [`ImportFrame`](crate::ImportFrame)
//! guard, so it is left on every exit path, including errors from the merger.

use std::fmt;
use std::sync::Arc;

use crate::discover::{find_imports, remove_import_statements};
use crate::error::ImportError;
use crate::observer::{ImportObserver, TracingObserver};
use crate::path::{clean_path, resolve_import};
use crate::resource::{ExtensionClassifier, Resource, ResourceClassifier};
use crate::rewrite::rewrite_use_directives;
use crate::session::{CorrelationId, SessionRegistry};

/// Fetches and processes imported resources on behalf of the resolver.
///
/// This is implemented by the enclosing build pipeline. Given the resolved
/// imports of one stylesheet, in discovery order, it reads each resource,
/// runs its import-aware processing (normally [`ImportResolver::process`]
/// with the same `correlation_id`) and returns the concatenated result.
pub trait ImportMerger: Send + Sync {
    fn process_and_merge(
        &self,
        imports: &[Resource],
        correlation_id: CorrelationId,
    ) -> Result<String, ImportError>;
}

/// Per-invocation collaborators of [`ImportResolver::process`].
#[derive(Clone, Copy)]
pub struct ImportContext<'a> {
    correlation_id: CorrelationId,
    merger: &'a dyn ImportMerger,
}

impl<'a> ImportContext<'a> {
    pub fn new(correlation_id: CorrelationId, merger: &'a dyn ImportMerger) -> Self {
        Self {
            correlation_id,
            merger,
        }
    }

    pub fn correlation_id(&self) -> CorrelationId {
        self.correlation_id
    }

    pub fn merger(&self) -> &'a dyn ImportMerger {
        self.merger
    }
}

impl fmt::Debug for ImportContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportContext")
            .field("correlation_id", &self.correlation_id)
            .field("merger", &"<ImportMerger>")
            .finish()
    }
}

/// Resolves `@import`/`@use` directives by recursively inlining imports.
///
/// One resolver can serve any number of concurrent builds: all per-build
/// state lives in the shared [`SessionRegistry`], keyed by the correlation
/// id of the [`ImportContext`].
pub struct ImportResolver {
    sessions: Arc<SessionRegistry>,
    observer: Arc<dyn ImportObserver>,
    classifier: Arc<dyn ResourceClassifier>,
}

impl ImportResolver {
    /// Create a resolver backed by `sessions`, reporting through
    /// [`TracingObserver`] and classifying imports by extension.
    pub fn new(sessions: Arc<SessionRegistry>) -> Self {
        Self {
            sessions,
            observer: Arc::new(TracingObserver),
            classifier: Arc::new(ExtensionClassifier),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ImportObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn ResourceClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// The session registry this resolver records imports in.
    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }

    /// Flatten `content`, the text of `resource`.
    ///
    /// Returns an empty string when `resource` was already imported in the
    /// build identified by `ctx`, which is how import cycles and repeated
    /// imports are cut off.
    ///
    /// # Errors
    ///
    /// - [`ImportError::MissingUri`] if `resource` has an empty uri
    /// - Any error returned by the merger; the session bookkeeping for this
    ///   resource is unwound before the error is returned
    pub fn process(
        &self,
        ctx: &ImportContext<'_>,
        resource: &Resource,
        content: &str,
    ) -> Result<String, ImportError> {
        if resource.uri().is_empty() {
            return Err(ImportError::MissingUri);
        }

        let id = ctx.correlation_id();
        tracing::debug!(uri = %resource, correlation_id = %id, "Resolving imports");

        let rewritten = rewrite_use_directives(content);
        let uri = clean_path(resource.uri());

        if self.sessions.is_already_imported(id, &uri) {
            self.observer.on_recursive_import(resource);
            return Ok(String::new());
        }

        let _frame = self.sessions.enter(id, &uri);

        let imports = self.find_imported_resources(&uri, &rewritten.content);
        let mut merged = String::new();
        if !imports.is_empty() {
            tracing::debug!(uri = %resource, count = imports.len(), "Imported resources found");
            merged = ctx.merger().process_and_merge(&imports, id)?;
            // Keep a trailing line comment in an import from swallowing the body
            if !merged.is_empty() && !merged.ends_with('\n') {
                merged.push('\n');
            }
        }

        merged.push_str(&remove_import_statements(&rewritten.content));
        Ok(merged)
    }

    /// Resolve the imports of `content` against `base_uri`.
    ///
    /// The result is in discovery order with duplicates removed (the first
    /// occurrence wins and every dropped duplicate is reported to the
    /// observer).
    pub fn find_imported_resources(&self, base_uri: &str, content: &str) -> Vec<Resource> {
        let mut imports: Vec<Resource> = Vec::new();
        for locator in find_imports(content) {
            let uri = resolve_import(base_uri, &locator);
            let kind = self.classifier.classify(&uri);
            let import = Resource::new(uri, kind);
            if imports.contains(&import) {
                self.observer.on_duplicate_import(&import);
            } else {
                self.observer.on_import_detected(&import);
                imports.push(import);
            }
        }
        imports
    }
}

impl fmt::Debug for ImportResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportResolver")
            .field("sessions", &self.sessions.len())
            .field("observer", &"<ImportObserver>")
            .field("classifier", &"<ResourceClassifier>")
            .finish()
    }
}
