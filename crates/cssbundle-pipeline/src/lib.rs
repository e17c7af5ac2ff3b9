//! Build pipeline for cssbundle.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! This crate provides:
//! - Project configuration (`_cssbundle.yml`) discovery and parsing
//! - The [`ResourceProcessor`] abstraction and the built-in processors
//!   (`css-import`, `scss`, `css-compress`)
//! - [`ProcessorRegistry`], which maps processor aliases to instances
//! - [`BundlePipeline`], which builds groups of stylesheets, concurrently
//!   when asked to build several

pub mod config;
pub mod error;
pub mod pipeline;
pub mod processor;
pub mod processors;
pub mod registry;

pub use config::{BundleConfig, CONFIG_FILE_NAMES, GroupConfig, LoadedConfig};
pub use error::{PipelineError, Result};
pub use pipeline::{BundlePipeline, Group, GroupOutput, hoist_remote_imports, write_group};
pub use processor::{ProcessContext, ResourceProcessor};
pub use processors::{CssCompressProcessor, CssImportProcessor, ScssProcessor};
pub use registry::ProcessorRegistry;
