//! Command implementations for the cssbundle CLI
//!
//! Each command module handles the CLI interface and delegates to
//! cssbundle-pipeline for the actual work.

pub mod build;
pub mod flatten;
