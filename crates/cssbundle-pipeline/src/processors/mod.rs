//! Built-in processors.
//!
//! Copyright (c) 2025 Posit, PBC

mod compress;
mod import;
mod scss;

pub use compress::CssCompressProcessor;
pub use import::CssImportProcessor;
pub use scss::{ScssProcessor, hoist_builtin_modules};
