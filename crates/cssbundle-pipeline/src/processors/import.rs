/*
 * import.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Processor that inlines @import/@use directives.
 */

use std::sync::Arc;

use cssbundle_core::{ImportResolver, Resource};

use crate::Result;
use crate::processor::{ProcessContext, ResourceProcessor};

/// Inlines imported stylesheets through an [`ImportResolver`].
///
/// Resolution re-enters the build through the context's merger, so imported
/// resources are fetched and processed by the same pipeline.
#[derive(Debug, Clone)]
pub struct CssImportProcessor {
    resolver: Arc<ImportResolver>,
}

impl CssImportProcessor {
    pub const ALIAS: &'static str = "css-import";

    pub fn new(resolver: Arc<ImportResolver>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &Arc<ImportResolver> {
        &self.resolver
    }
}

impl ResourceProcessor for CssImportProcessor {
    fn name(&self) -> &str {
        Self::ALIAS
    }

    fn is_import_aware(&self) -> bool {
        true
    }

    fn process(&self, ctx: &ProcessContext<'_>, resource: &Resource, content: &str) -> Result<String> {
        Ok(self
            .resolver
            .process(&ctx.import_context(), resource, content)?)
    }
}
