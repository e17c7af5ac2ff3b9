/*
 * compress.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * CSS minimization processor.
 */

use std::sync::Arc;

use cssbundle_core::{Resource, ResourceType};
use cssbundle_runtime::{ResourceLocator, compile_scss};

use crate::error::{PipelineError, Result};
use crate::processor::{ProcessContext, ResourceProcessor};

/// Minimizes CSS by re-emitting it with grass' compressed output style.
///
/// Only runs when the build has minimization enabled.
pub struct CssCompressProcessor {
    locator: Arc<dyn ResourceLocator>,
}

impl CssCompressProcessor {
    pub const ALIAS: &'static str = "css-compress";

    pub fn new(locator: Arc<dyn ResourceLocator>) -> Self {
        Self { locator }
    }
}

impl std::fmt::Debug for CssCompressProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CssCompressProcessor").finish_non_exhaustive()
    }
}

impl ResourceProcessor for CssCompressProcessor {
    fn name(&self) -> &str {
        Self::ALIAS
    }

    fn is_minimize(&self) -> bool {
        true
    }

    fn supports(&self, kind: ResourceType) -> bool {
        kind == ResourceType::Css
    }

    fn process(&self, _ctx: &ProcessContext<'_>, resource: &Resource, content: &str) -> Result<String> {
        if content.trim().is_empty() {
            return Ok(String::new());
        }

        tracing::debug!(uri = %resource, "Compressing CSS");
        compile_scss(self.locator.as_ref(), content, &[], true).map_err(|e| {
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

    #[test]
    fn test_compress_css() {
        let processor = CssCompressProcessor::new(Arc::new(MemoryLocator::new()));
        let ctx = ProcessContext::new(CorrelationId::new(), &NoMerge);
        let css = ".a {\n  color: red;\n}\n\n.b {\n  margin: 0;\n}\n";

        let out = processor.process(&ctx, &Resource::css("site.css"), css).unwrap();

        assert!(!out.contains("\n\n"));
        assert!(out.contains(".a{color:red}"));
        assert!(processor.is_minimize());
    }

    #[test]
    fn test_only_supports_css() {
        let processor = CssCompressProcessor::new(Arc::new(MemoryLocator::new()));
        assert!(processor.supports(ResourceType::Css));
        assert!(!processor.supports(ResourceType::Scss));
    }
}
