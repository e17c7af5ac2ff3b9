/*
 * flatten.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Flatten command implementation
 */

//! Flatten command implementation.
//!
//! Runs import resolution on one stylesheet, optionally followed by SCSS
//! compilation and minimization, without a project configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use cssbundle_core::{ExtensionClassifier, Resource, ResourceClassifier};
use cssbundle_pipeline::{BundleConfig, BundlePipeline, CssImportProcessor, Group, ScssProcessor};
use cssbundle_runtime::NativeLocator;

/// Arguments for the flatten command
#[derive(Debug, Default)]
pub struct FlattenArgs {
    /// Stylesheet to flatten
    pub file: PathBuf,
    /// Compile the flattened result as SCSS
    pub compile: bool,
    /// Minimize the result
    pub minimize: bool,
    /// Output file (stdout when absent)
    pub output: Option<PathBuf>,
}

/// Flatten `args.file` and return the resulting stylesheet.
pub fn flatten(args: &FlattenArgs) -> Result<String> {
    let file_name = args
        .file
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Not a stylesheet path: {}", args.file.display()))?;
    let dir = args
        .file
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let config = BundleConfig {
        pre_processors: vec![CssImportProcessor::ALIAS.to_string()],
        post_processors: if args.compile {
            vec![ScssProcessor::ALIAS.to_string()]
        } else {
            Vec::new()
        },
        minimize: args.minimize,
        ..BundleConfig::default()
    };
    let pipeline = BundlePipeline::new(Arc::new(NativeLocator::new(dir)), &config)?;

    let resource = Resource::new(file_name, ExtensionClassifier.classify(file_name));
    let stem = args
        .file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("flattened");
    debug!(file = %args.file.display(), "Flattening");

    pipeline
        .build_group(&Group::new(stem, vec![resource]))
        .with_context(|| format!("Failed to flatten {}", args.file.display()))
}

/// Execute the flatten command
pub fn execute(args: FlattenArgs) -> Result<()> {
    let css = flatten(&args)?;
    match &args.output {
        Some(path) => std::fs::write(path, css)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", css),
    }
    Ok(())
}
