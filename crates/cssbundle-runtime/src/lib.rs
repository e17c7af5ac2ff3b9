/*
 * cssbundle-runtime
 * Copyright (c) 2025 Posit, PBC
 *
 * Resource access layer for cssbundle.
 *
 * Stylesheets are read through the `ResourceLocator` trait so the same
 * build can run against different sources:
 *
 * - NativeLocator: the local filesystem, rooted at a base directory
 * - MemoryLocator: an in-memory map of files (tests, embedding hosts)
 *
 * Sass compilation goes through the same locator, so `@import`s that the
 * compiler resolves itself see exactly the files the bundler sees.
 */

mod memory;
mod native;
mod sass;
mod traits;

pub use traits::{ResourceLocator, RuntimeError, RuntimeResult, partial_candidates};

pub use memory::MemoryLocator;
pub use native::NativeLocator;

pub use sass::{LocatorFs, compile_scss};
