/*
 * session.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Per-build import bookkeeping, keyed by correlation id.
 */

//! Import sessions shared between concurrent builds.
//!
//! Every top-level build carries a [`CorrelationId`]. All recursive
//! resolutions triggered by that build share it, so they see one
//! [`Session`]: the set of uris already inlined and the stack of uris
//! currently being resolved.
//!
//! # Lifecycle
//!
//! - A session is created explicitly by [`SessionRegistry::get_or_create`]
//!   (which [`SessionRegistry::record_import_start`] calls).
//! - It is removed by [`SessionRegistry::record_import_end`] as soon as its
//!   stack becomes empty.
//!
//! Every start must therefore be paired with exactly one end, on every exit
//! path. [`SessionRegistry::enter`] returns an [`ImportFrame`] guard that
//! does the pairing on drop, including during unwinding and early `?`
//! returns.
//!
//! # Thread Safety
//!
//! The registry is a [`DashMap`], so distinct correlation ids never contend
//! on a global lock. A single correlation id is only ever driven by one
//! logical call stack; the per-session mutex is there to make handles
//! shareable, not to arbitrate between competing writers.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashmap::DashMap;
use uuid::Uuid;

/// Identifies one top-level build and its whole recursive call chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    /// Generate a fresh, random correlation id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Bookkeeping for one correlation id.
///
/// Every uri on the stack is also in the visited set. The visited set keeps
/// uris whose subtree already finished, so they are not inlined twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    visited: HashSet<String>,
    stack: Vec<String>,
}

impl Session {
    /// Uris inlined (or being inlined) during this build.
    pub fn visited(&self) -> &HashSet<String> {
        &self.visited
    }

    /// Uris currently being resolved, innermost last.
    pub fn stack(&self) -> &[String] {
        &self.stack
    }

    /// Current recursion depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn has_visited(&self, uri: &str) -> bool {
        self.visited.contains(uri)
    }

    fn push(&mut self, uri: &str) {
        self.visited.insert(uri.to_string());
        self.stack.push(uri.to_string());
    }

    fn pop(&mut self) -> Option<String> {
        self.stack.pop()
    }
}

/// Shared, owned handle to a session stored in a [`SessionRegistry`].
pub type SessionHandle = Arc<Mutex<Session>>;

fn lock(handle: &SessionHandle) -> MutexGuard<'_, Session> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Concurrent registry of import sessions keyed by [`CorrelationId`].
///
/// The registry is meant to be created once and handed to every resolver
/// that should share it (usually behind an `Arc`). Separate registries are
/// fully isolated from each other.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<CorrelationId, SessionHandle>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the session for `id`, creating and storing an empty one when
    /// none exists yet.
    ///
    /// The session stays in the registry until its stack is emptied by
    /// [`record_import_end`](Self::record_import_end), so callers must not
    /// use this for a plain lookup. Use [`snapshot`](Self::snapshot) or
    /// [`is_already_imported`](Self::is_already_imported) instead.
    pub fn get_or_create(&self, id: CorrelationId) -> SessionHandle {
        self.sessions.entry(id).or_default().value().clone()
    }

    /// Check whether `uri` was already imported during the build `id`.
    ///
    /// Unknown ids report `false` and are not added to the registry.
    pub fn is_already_imported(&self, id: CorrelationId, uri: &str) -> bool {
        self.sessions
            .get(&id)
            .is_some_and(|handle| lock(handle.value()).has_visited(uri))
    }

    /// Mark `uri` as being resolved: push it on the stack and record it as
    /// visited, creating the session if needed.
    pub fn record_import_start(&self, id: CorrelationId, uri: &str) {
        let handle = self.get_or_create(id);
        lock(&handle).push(uri);
    }

    /// Leave the innermost import frame of build `id`.
    ///
    /// Pops the stack (no-op when empty) and removes the whole session once
    /// the stack is empty.
    pub fn record_import_end(&self, id: CorrelationId) {
        let Some(handle) = self.sessions.get(&id).map(|entry| entry.value().clone()) else {
            return;
        };
        let now_empty = {
            let mut session = lock(&handle);
            session.pop();
            session.stack.is_empty()
        };
        if now_empty {
            self.sessions
                .remove_if(&id, |_, handle| lock(handle).stack.is_empty());
        }
    }

    /// Enter an import frame for `uri`; the frame is left when the returned
    /// guard is dropped.
    pub fn enter(&self, id: CorrelationId, uri: &str) -> ImportFrame<'_> {
        self.record_import_start(id, uri);
        ImportFrame { registry: self, id }
    }

    /// Copy of the current state of session `id`, if any.
    pub fn snapshot(&self, id: CorrelationId) -> Option<Session> {
        self.sessions
            .get(&id)
            .map(|handle| lock(handle.value()).clone())
    }

    /// Check whether a session exists for `id`.
    pub fn contains(&self, id: CorrelationId) -> bool {
        self.sessions.contains_key(&id)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// RAII guard for one import frame, see [`SessionRegistry::enter`].
#[must_use = "the import frame is left as soon as the guard is dropped"]
pub struct ImportFrame<'a> {
    registry: &'a SessionRegistry,
    id: CorrelationId,
}

impl ImportFrame<'_> {
    pub fn correlation_id(&self) -> CorrelationId {
        self.id
    }
}

impl Drop for ImportFrame<'_> {
    fn drop(&mut self) {
        self.registry.record_import_end(self.id);
    }
}
