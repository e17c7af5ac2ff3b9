/*
 * pipeline.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Group builds: fetch, pre chain, merge, post chain.
 */

//! Group builds.
//!
//! Building a group runs, for each of its resources in order:
//!
//! 1. fetch the resource through the [`ResourceLocator`]
//! 2. apply the pre chain (minimize processors only when minimizing)
//!
//! The processed resources are joined with `\n` and the post chain is
//! applied to the result.
//!
//! Every group build gets its own [`CorrelationId`]; all import resolution
//! triggered by the build shares it. [`BundlePipeline`] is also the
//! [`ImportMerger`] of that resolution: imported resources are fetched and
//! run through the import-aware part of the pre chain.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cssbundle_core::{
    CorrelationId, ImportError, ImportMerger, ImportResolver, Resource, ResourceClassifier,
    ResourceType, SessionRegistry, is_external,
};
use cssbundle_runtime::{NativeLocator, ResourceLocator, RuntimeError};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{BundleConfig, GroupConfig, LoadedConfig};
use crate::error::{PipelineError, Result};
use crate::processor::{ProcessContext, ResourceProcessor};
use crate::processors::CssCompressProcessor;
use crate::registry::ProcessorRegistry;

/// Schemes of imports that are left for the browser to fetch.
const REMOTE_SCHEMES: &[&str] = &["http", "https", "ftp"];

/// A whole kept remote import line, as written by the merger.
static REMOTE_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^[ \t]*@import url\("(?i:https?|ftp)://[^"]*"\);[ \t]*\r?\n?"#).unwrap()
});

fn is_remote(uri: &str) -> bool {
    is_external(uri)
        && uri.split_once(':').is_some_and(|(scheme, _)| {
            REMOTE_SCHEMES
                .iter()
                .any(|remote| scheme.eq_ignore_ascii_case(remote))
        })
}

/// Move kept remote `@import` statements to the top of `css`.
///
/// Inlining leaves them wherever their importer was, but an `@import` after
/// any other rule is ignored by browsers. Identical statements are kept
/// once, in first-seen order.
pub fn hoist_remote_imports(css: &str) -> String {
    let mut seen = HashSet::new();
    let imports: Vec<&str> = REMOTE_IMPORT
        .find_iter(css)
        .map(|m| m.as_str().trim())
        .filter(|import| seen.insert(*import))
        .collect();
    if imports.is_empty() {
        return css.to_string();
    }

    let rest = REMOTE_IMPORT.replace_all(css, "");
    let mut hoisted = imports.join("\n");
    hoisted.push('\n');
    hoisted.push_str(&rest);
    hoisted
}

/// A named, ordered list of resources bundled into one stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub resources: Vec<Resource>,
}

impl Group {
    pub fn new(name: impl Into<String>, resources: Vec<Resource>) -> Self {
        Self {
            name: name.into(),
            resources,
        }
    }

    pub fn from_config(config: &GroupConfig, classifier: &dyn ResourceClassifier) -> Self {
        let resources = config
            .resources
            .iter()
            .map(|uri| Resource::new(uri.as_str(), classifier.classify(uri)))
            .collect();
        Self::new(config.name.as_str(), resources)
    }

    /// The resource the post chain sees: `<name>.css`.
    pub fn output_resource(&self) -> Resource {
        Resource::css(format!("{}.css", self.name))
    }
}

/// Result of building one group with [`BundlePipeline::build_all`].
#[derive(Debug)]
pub struct GroupOutput {
    pub name: String,
    pub result: Result<String>,
}

/// Builds groups of stylesheets.
///
/// One pipeline can build any number of groups, concurrently. Builds only
/// share the locator, the processors and the session registry (which keeps
/// their import bookkeeping apart by correlation id).
pub struct BundlePipeline {
    locator: Arc<dyn ResourceLocator>,
    sessions: Arc<SessionRegistry>,
    pre: Vec<Arc<dyn ResourceProcessor>>,
    post: Vec<Arc<dyn ResourceProcessor>>,
    minimize: bool,
    ignore_missing: bool,
}

impl BundlePipeline {
    /// Pipeline with the built-in processors, configured by `config`.
    ///
    /// # Errors
    ///
    /// [`PipelineError::UnknownProcessor`] if `config` names an alias that
    /// is not built in.
    pub fn new(locator: Arc<dyn ResourceLocator>, config: &BundleConfig) -> Result<Self> {
        let sessions = Arc::new(SessionRegistry::new());
        let resolver = Arc::new(ImportResolver::new(sessions.clone()));
        let registry =
            ProcessorRegistry::with_defaults(resolver, locator.clone(), config.load_paths.clone());
        Self::with_registry(locator, sessions, &registry, config)
    }

    /// Pipeline reading from the filesystem below the configuration's
    /// directory.
    pub fn from_loaded(loaded: &LoadedConfig) -> Result<Self> {
        Self::new(Arc::new(NativeLocator::new(&loaded.root)), &loaded.config)
    }

    /// Pipeline whose processor chains are looked up in `registry`.
    ///
    /// `sessions` must be the registry used by the import resolver of the
    /// import-aware processors in `registry`.
    pub fn with_registry(
        locator: Arc<dyn ResourceLocator>,
        sessions: Arc<SessionRegistry>,
        registry: &ProcessorRegistry,
        config: &BundleConfig,
    ) -> Result<Self> {
        let pre = registry.resolve_pre(&config.pre_processors)?;
        let mut post = registry.resolve_post(&config.post_processors)?;
        if config.minimize && !post.iter().any(|processor| processor.is_minimize()) {
            let compress = registry.post(CssCompressProcessor::ALIAS).ok_or_else(|| {
                PipelineError::UnknownProcessor {
                    alias: CssCompressProcessor::ALIAS.to_string(),
                }
            })?;
            post.push(compress);
        }

        Ok(Self {
            locator,
            sessions,
            pre,
            post,
            minimize: config.minimize,
            ignore_missing: config.ignore_missing_resources,
        })
    }

    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }

    pub fn locator(&self) -> &Arc<dyn ResourceLocator> {
        &self.locator
    }

    /// Build one group into a single stylesheet.
    ///
    /// # Errors
    ///
    /// Fails on the first resource that cannot be read (unless missing
    /// resources are ignored) or on the first processor error.
    pub fn build_group(&self, group: &Group) -> Result<String> {
        let id = CorrelationId::new();
        tracing::debug!(group = %group.name, correlation_id = %id, "Building group");

        let ctx = ProcessContext::new(id, self);
        let mut parts = Vec::with_capacity(group.resources.len());
        for resource in &group.resources {
            let content = match self.locator.fetch_string(resource.uri()) {
                Ok(content) => content,
                Err(e) if self.ignore_missing => {
                    tracing::warn!(group = %group.name, uri = %resource, error = %e, "Skipping unreadable resource");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            parts.push(self.apply_pre(&ctx, resource, content, false)?);
        }

        let output = group.output_resource();
        let mut content = hoist_remote_imports(&parts.join("\n"));
        for processor in self.active(&self.post, output.kind()) {
            content = processor.process(&ctx, &output, &content)?;
        }

        tracing::info!(group = %group.name, bytes = content.len(), "Group built");
        Ok(content)
    }

    /// Build `groups` concurrently.
    ///
    /// Groups are split into one chunk per available core and each chunk is
    /// built on its own thread. Outputs are returned in the order of
    /// `groups`; a failing group does not stop the others.
    pub fn build_all(&self, groups: &[Group]) -> Vec<GroupOutput> {
        if groups.is_empty() {
            return Vec::new();
        }
        let worker_count = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(groups.len());
        let chunk_size = groups.len().div_ceil(worker_count).max(1);

        std::thread::scope(|scope| {
            let handles: Vec<_> = groups
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|group| GroupOutput {
                                name: group.name.clone(),
                                result: self.build_group(group),
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        })
    }

    /// Processors of `chain` that run on a resource of `kind`.
    fn active<'a>(
        &self,
        chain: &'a [Arc<dyn ResourceProcessor>],
        kind: ResourceType,
    ) -> impl Iterator<Item = &'a Arc<dyn ResourceProcessor>> {
        let minimize = self.minimize;
        chain
            .iter()
            .filter(move |processor| (minimize || !processor.is_minimize()) && processor.supports(kind))
    }

    fn apply_pre(
        &self,
        ctx: &ProcessContext<'_>,
        resource: &Resource,
        mut content: String,
        import_only: bool,
    ) -> Result<String> {
        for processor in self.active(&self.pre, resource.kind()) {
            if import_only && !processor.is_import_aware() {
                continue;
            }
            content = processor.process(ctx, resource, &content)?;
        }
        Ok(content)
    }

    /// Content standing in for an import the locator cannot serve.
    fn unreadable_import(&self, import: &Resource, error: RuntimeError) -> std::result::Result<Option<String>, ImportError> {
        match error {
            // Remote stylesheets stay remote
            RuntimeError::NotSupported(_) if is_remote(import.uri()) => {
                tracing::debug!(uri = %import, "Keeping external import");
                Ok(Some(format!("@import url(\"{}\");", import.uri())))
            }
            e if self.ignore_missing => {
                tracing::warn!(uri = %import, error = %e, "Skipping unreadable import");
                Ok(None)
            }
            e => Err(ImportError::Fetch {
                uri: import.uri().to_string(),
                message: e.to_string(),
            }),
        }
    }
}

impl ImportMerger for BundlePipeline {
    fn process_and_merge(
        &self,
        imports: &[Resource],
        correlation_id: CorrelationId,
    ) -> std::result::Result<String, ImportError> {
        let ctx = ProcessContext::new(correlation_id, self);
        let mut parts = Vec::with_capacity(imports.len());
        for import in imports {
            let content = match self.locator.fetch_string(import.uri()) {
                Ok(content) => content,
                Err(e) => {
                    parts.extend(self.unreadable_import(import, e)?);
                    continue;
                }
            };
            let processed = self
                .apply_pre(&ctx, import, content, true)
                .map_err(|e| e.into_import_error(import.uri()))?;
            parts.push(processed);
        }
        Ok(parts.join("\n"))
    }
}

impl std::fmt::Debug for BundlePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = |chain: &[Arc<dyn ResourceProcessor>]| -> Vec<String> {
            chain.iter().map(|p| p.name().to_string()).collect()
        };
        f.debug_struct("BundlePipeline")
            .field("pre", &names(&self.pre))
            .field("post", &names(&self.post))
            .field("minimize", &self.minimize)
            .field("ignore_missing", &self.ignore_missing)
            .finish_non_exhaustive()
    }
}

/// Write `content` to `<dir>/<group>.css`, creating `dir` if needed.
pub fn write_group(dir: &Path, group: &str, content: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(RuntimeError::from)?;
    let path = dir.join(format!("{group}.css"));
    std::fs::write(&path, content).map_err(RuntimeError::from)?;
    tracing::debug!(path = %path.display(), "Wrote group");
    Ok(path)
}
