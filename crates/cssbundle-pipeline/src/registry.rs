/*
 * registry.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Alias tables for pre and post processors.
 */

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use cssbundle_core::ImportResolver;
use cssbundle_runtime::ResourceLocator;

use crate::error::{PipelineError, Result};
use crate::processor::ResourceProcessor;
use crate::processors::{CssCompressProcessor, CssImportProcessor, ScssProcessor};

/// Maps processor aliases to processor instances.
///
/// Pre and post processors live in separate tables, so the same alias can
/// name different processors in each position.
#[derive(Default)]
pub struct ProcessorRegistry {
    pre: HashMap<String, Arc<dyn ResourceProcessor>>,
    post: HashMap<String, Arc<dyn ResourceProcessor>>,
}

impl ProcessorRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in processors:
    ///
    /// | alias          | pre | post |
    /// |----------------|-----|------|
    /// | `css-import`   | yes | no   |
    /// | `scss`         | yes | yes  |
    /// | `css-compress` | yes | yes  |
    pub fn with_defaults(
        resolver: Arc<ImportResolver>,
        locator: Arc<dyn ResourceLocator>,
        load_paths: Vec<PathBuf>,
    ) -> Self {
        let import: Arc<dyn ResourceProcessor> = Arc::new(CssImportProcessor::new(resolver));
        let scss: Arc<dyn ResourceProcessor> =
            Arc::new(ScssProcessor::new(locator.clone(), load_paths));
        let compress: Arc<dyn ResourceProcessor> = Arc::new(CssCompressProcessor::new(locator));

        let mut registry = Self::new();
        registry.register_pre(CssImportProcessor::ALIAS, import);
        registry.register_pre(ScssProcessor::ALIAS, scss.clone());
        registry.register_pre(CssCompressProcessor::ALIAS, compress.clone());
        registry.register_post(ScssProcessor::ALIAS, scss);
        registry.register_post(CssCompressProcessor::ALIAS, compress);
        registry
    }

    /// Register (or replace) a pre processor.
    pub fn register_pre(&mut self, alias: impl Into<String>, processor: Arc<dyn ResourceProcessor>) {
        self.pre.insert(alias.into(), processor);
    }

    /// Register (or replace) a post processor.
    pub fn register_post(
        &mut self,
        alias: impl Into<String>,
        processor: Arc<dyn ResourceProcessor>,
    ) {
        self.post.insert(alias.into(), processor);
    }

    pub fn pre(&self, alias: &str) -> Option<Arc<dyn ResourceProcessor>> {
        self.pre.get(alias).cloned()
    }

    pub fn post(&self, alias: &str) -> Option<Arc<dyn ResourceProcessor>> {
        self.post.get(alias).cloned()
    }

    /// Look up a chain of pre processors, in the order given.
    ///
    /// # Errors
    ///
    /// [`PipelineError::UnknownProcessor`] for the first unregistered alias.
    pub fn resolve_pre(&self, aliases: &[String]) -> Result<Vec<Arc<dyn ResourceProcessor>>> {
        resolve(&self.pre, aliases)
    }

    /// Look up a chain of post processors, in the order given.
    ///
    /// # Errors
    ///
    /// [`PipelineError::UnknownProcessor`] for the first unregistered alias.
    pub fn resolve_post(&self, aliases: &[String]) -> Result<Vec<Arc<dyn ResourceProcessor>>> {
        resolve(&self.post, aliases)
    }

    /// Registered pre processor aliases, sorted.
    pub fn pre_aliases(&self) -> Vec<&str> {
        sorted_keys(&self.pre)
    }

    /// Registered post processor aliases, sorted.
    pub fn post_aliases(&self) -> Vec<&str> {
        sorted_keys(&self.post)
    }
}

fn resolve(
    table: &HashMap<String, Arc<dyn ResourceProcessor>>,
    aliases: &[String],
) -> Result<Vec<Arc<dyn ResourceProcessor>>> {
    aliases
        .iter()
        .map(|alias| {
            table
                .get(alias)
                .cloned()
                .ok_or_else(|| PipelineError::UnknownProcessor {
                    alias: alias.clone(),
                })
        })
        .collect()
}

fn sorted_keys(table: &HashMap<String, Arc<dyn ResourceProcessor>>) -> Vec<&str> {
    let mut keys: Vec<&str> = table.keys().map(String::as_str).collect();
    keys.sort_unstable();
    keys
}

impl std::fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorRegistry")
            .field("pre", &self.pre_aliases())
            .field("post", &self.post_aliases())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cssbundle_core::SessionRegistry;
    use cssbundle_runtime::MemoryLocator;

    fn defaults() -> ProcessorRegistry {
        ProcessorRegistry::with_defaults(
            Arc::new(ImportResolver::new(Arc::new(SessionRegistry::new()))),
            Arc::new(MemoryLocator::new()),
            Vec::new(),
        )
    }

    #[test]
    fn test_default_aliases() {
        let registry = defaults();
        assert_eq!(
            registry.pre_aliases(),
            vec!["css-compress", "css-import", "scss"]
        );
        assert_eq!(registry.post_aliases(), vec!["css-compress", "scss"]);
    }

    #[test]
    fn test_resolve_keeps_order() {
        let registry = defaults();
        let chain = registry
            .resolve_post(&["css-compress".to_string(), "scss".to_string()])
            .unwrap();
        let names: Vec<&str> = chain.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["css-compress", "scss"]);
    }

    #[test]
    fn test_unknown_alias() {
        let registry = defaults();
        let err = registry
            .resolve_post(&["css-import".to_string()])
            .err()
            .unwrap();
        assert!(matches!(err, PipelineError::UnknownProcessor { ref alias } if alias == "css-import"));
    }

    #[test]
    fn test_flags_of_builtins() {
        let registry = defaults();
        assert!(registry.pre("css-import").unwrap().is_import_aware());
        assert!(!registry.pre("scss").unwrap().is_import_aware());
        assert!(registry.post("css-compress").unwrap().is_minimize());
        assert!(registry.pre("missing").is_none());
    }
}
