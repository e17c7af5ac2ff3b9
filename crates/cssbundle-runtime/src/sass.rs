//! SASS compilation using the grass crate.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Key components:
//! - `LocatorFs`: Adapter implementing `grass::Fs` for a `ResourceLocator`
//! - `compile_scss`: High-level function for SCSS compilation

use std::fmt::Debug;
use std::io;
use std::path::{Path, PathBuf};

use grass::{Options, OutputStyle};

use crate::traits::{ResourceLocator, RuntimeError, RuntimeResult};

/// Adapter that implements `grass::Fs` using a `ResourceLocator`.
///
/// Imports that survive bundling (or that the compiler resolves through its
/// load paths) are read from the same locator as the bundled resources.
pub struct LocatorFs<'a> {
    locator: &'a dyn ResourceLocator,
}

impl<'a> LocatorFs<'a> {
    pub fn new(locator: &'a dyn ResourceLocator) -> Self {
        Self { locator }
    }
}

impl Debug for LocatorFs<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocatorFs")
            .field("locator", &"<ResourceLocator>")
            .finish()
    }
}

impl grass::Fs for LocatorFs<'_> {
    fn is_dir(&self, path: &Path) -> bool {
        self.locator.is_dir(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.locator.is_file(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.locator.read(path).map_err(|e| match e {
            RuntimeError::Io(inner) => inner,
            other => io::Error::new(io::ErrorKind::NotFound, other.to_string()),
        })
    }
}

/// Compile SCSS source to CSS using grass.
///
/// # Arguments
///
/// * `locator` - Where `@import`s left for the compiler are read from
/// * `scss` - The SCSS source code to compile
/// * `load_paths` - Directories to search for @use/@import resolution
/// * `minified` - Whether to produce compressed output
///
/// # Returns
///
/// Compiled CSS string on success, `RuntimeError::SassError` on failure.
pub fn compile_scss(
    locator: &dyn ResourceLocator,
    scss: &str,
    load_paths: &[PathBuf],
    minified: bool,
) -> RuntimeResult<String> {
    let fs = LocatorFs::new(locator);

    let style = if minified {
        OutputStyle::Compressed
    } else {
        OutputStyle::Expanded
    };

    let options = Options::default()
        .fs(&fs)
        .load_paths(load_paths)
        .style(style);

    grass::from_string(scss, &options).map_err(|e| RuntimeError::SassError(e.to_string()))
}
