//! Stylesheet import resolution for cssbundle.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! This crate provides:
//! - Rewriting of module-style `@use` directives into classic `@import`
//! - Discovery and removal of `@import` statements
//! - Per-build session bookkeeping (visited set + call stack) keyed by
//!   correlation id, safe to share between concurrent builds
//! - The recursive [`ImportResolver`] that inlines imported stylesheets
//!   through an external [`ImportMerger`]

mod discover;
mod error;
mod observer;
mod path;
mod resolver;
mod resource;
mod rewrite;
mod session;

pub use discover::{contains_import, find_imports, remove_import_statements};
pub use error::ImportError;
pub use observer::{ImportObserver, NoopObserver, TracingObserver};
pub use path::{clean_path, folder_of, is_external, normalize_separators, resolve_import};
pub use resolver::{ImportContext, ImportMerger, ImportResolver};
pub use resource::{ExtensionClassifier, Resource, ResourceClassifier, ResourceType};
pub use rewrite::{RewrittenSource, rewrite_use_directives, strip_alias_prefix};
pub use session::{CorrelationId, ImportFrame, Session, SessionHandle, SessionRegistry};
