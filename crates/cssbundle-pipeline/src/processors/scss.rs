/*
 * scss.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * SCSS compilation processor.
 */

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use cssbundle_core::Resource;
use cssbundle_runtime::{ResourceLocator, compile_scss};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{PipelineError, Result};
use crate::processor::{ProcessContext, ResourceProcessor};

/// A whole `@use` line loading a built-in `sass:` module.
static BUILTIN_USE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^[ \t]*@use\s+['"]sass:[\w\-]+['"][^;\n]*;[ \t]*\r?\n?"#).unwrap()
});

/// Move `@use 'sass:*'` directives to the top of `scss`.
///
/// After imports are inlined, built-in module loads end up wherever the
/// importing file was, but Sass only accepts `@use` before any other rule.
/// Identical directives are kept once, in first-seen order.
///
/// ```
/// use cssbundle_pipeline::processors::hoist_builtin_modules;
///
/// let scss = ".a { x: 1; }\n@use 'sass:math';\n.b { y: math.max(1, 2); }\n";
/// assert_eq!(
///     hoist_builtin_modules(scss),
///     "@use 'sass:math';\n.a { x: 1; }\n.b { y: math.max(1, 2); }\n"
/// );
/// ```
pub fn hoist_builtin_modules(scss: &str) -> String {
    let mut seen = HashSet::new();
    let directives: Vec<&str> = BUILTIN_USE
        .find_iter(scss)
        .map(|m| m.as_str().trim())
        .filter(|directive| seen.insert(*directive))
        .collect();
    if directives.is_empty() {
        return scss.to_string();
    }

    let rest = BUILTIN_USE.replace_all(scss, "");
    let mut hoisted = directives.join("\n");
    hoisted.push('\n');
    hoisted.push_str(&rest);
    hoisted
}

/// Compiles SCSS to CSS with grass.
///
/// `@import`s still present after bundling (for example from load paths)
/// are read through the locator.
pub struct ScssProcessor {
    locator: Arc<dyn ResourceLocator>,
    load_paths: Vec<PathBuf>,
}

impl ScssProcessor {
    pub const ALIAS: &'static str = "scss";

    pub fn new(locator: Arc<dyn ResourceLocator>, load_paths: Vec<PathBuf>) -> Self {
        Self {
            locator,
            load_paths,
        }
    }
}

impl std::fmt::Debug for ScssProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScssProcessor")
            .field("locator", &"<ResourceLocator>")
            .field("load_paths", &self.load_paths)
            .finish()
    }
}

impl ResourceProcessor for ScssProcessor {
    fn name(&self) -> &str {
        Self::ALIAS
    }

    fn process(&self, _ctx: &ProcessContext<'_>, resource: &Resource, content: &str) -> Result<String> {
        if content.trim().is_empty() {
            return Ok(String::new());
        }

        tracing::debug!(uri = %resource, "Compiling SCSS");
        let source = hoist_builtin_modules(content);
        compile_scss(self.locator.as_ref(), &source, &self.load_paths, false).map_err(|e| {
            PipelineError::Processor {
                processor: Self::ALIAS.to_string(),
                uri: resource.uri().to_string(),
                message: e.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cssbundle_core::{CorrelationId, ImportError, ImportMerger};
    use cssbundle_runtime::MemoryLocator;
    use pretty_assertions::assert_eq;

    struct NoMerge;

    impl ImportMerger for NoMerge {
        fn process_and_merge(
            &self,
            _imports: &[Resource],
            _correlation_id: CorrelationId,
        ) -> std::result::Result<String, ImportError> {
            Ok(String::new())
        }
    }

    fn processor() -> ScssProcessor {
        ScssProcessor::new(Arc::new(MemoryLocator::new()), Vec::new())
    }

    #[test]
    fn test_hoist_dedupes_builtin_modules() {
        let scss = "@use 'sass:math';\n.a {}\n@use \"sass:color\";\n@use 'sass:math';\n.b {}";
        assert_eq!(
            hoist_builtin_modules(scss),
            "@use 'sass:math';\n@use \"sass:color\";\n.a {}\n.b {}"
        );
    }

    #[test]
    fn test_hoist_without_builtin_modules_is_identity() {
        let scss = ".a { color: red; }\n@import 'x.css';";
        assert_eq!(hoist_builtin_modules(scss), scss);
    }

    #[test]
    fn test_hoist_keeps_namespace() {
        let scss = ".a {}\n@use 'sass:math' as m;\n";
        assert_eq!(hoist_builtin_modules(scss), "@use 'sass:math' as m;\n.a {}\n");
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let ctx = ProcessContext::new(CorrelationId::new(), &NoMerge);
        let out = processor()
            .process(&ctx, &Resource::scss("empty.scss"), "  \n")
            .unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn test_compile_after_hoisting() {
        let ctx = ProcessContext::new(CorrelationId::new(), &NoMerge);
        let scss = "$w: 10px;\n@use 'sass:math';\n.a { width: math.max($w, 20px); }";
        let out = processor()
            .process(&ctx, &Resource::scss("a.scss"), scss)
            .unwrap();
        assert!(out.contains("width: 20px"));
    }

    #[test]
    fn test_compile_error_names_resource() {
        let ctx = ProcessContext::new(CorrelationId::new(), &NoMerge);
        let err = processor()
            .process(&ctx, &Resource::scss("broken.scss"), ".a { color: $nope; }")
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Processor { ref processor, ref uri, .. }
                if processor == "scss" && uri == "broken.scss"
        ));
    }
}
