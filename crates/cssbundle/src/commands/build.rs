/*
 * build.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Build command implementation
 */

//! Build command implementation.
//!
//! Loads the project configuration, builds the selected groups
//! concurrently and writes each one to `<output-dir>/<group>.css`.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{error, info};

use cssbundle_core::ExtensionClassifier;
use cssbundle_pipeline::{BundlePipeline, LoadedConfig, write_group};

/// Arguments for the build command
#[derive(Debug, Default)]
pub struct BuildArgs {
    /// Explicit configuration file
    pub config: Option<PathBuf>,
    /// Groups to build (all when empty)
    pub groups: Vec<String>,
    /// Output directory override
    pub output_dir: Option<PathBuf>,
    /// Force minimization on
    pub minimize: bool,
    /// Print instead of writing files
    pub stdout: bool,
}

fn load_config(args: &BuildArgs) -> Result<LoadedConfig> {
    if let Some(path) = &args.config {
        return LoadedConfig::load(path)
            .with_context(|| format!("Failed to load {}", path.display()));
    }

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    LoadedConfig::discover(&cwd)?.with_context(|| {
        format!(
            "No _cssbundle.yml found in {} or any parent directory",
            cwd.display()
        )
    })
}

/// Execute the build command
pub fn execute(args: BuildArgs) -> Result<()> {
    let mut loaded = load_config(&args)?;
    if args.minimize {
        loaded.config.minimize = true;
    }

    let pipeline = BundlePipeline::from_loaded(&loaded)?;
    let groups = loaded
        .config
        .select_groups(&args.groups, &ExtensionClassifier)?;
    if groups.is_empty() {
        anyhow::bail!("No groups defined in {}", loaded.path.display());
    }

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| loaded.output_dir());

    info!(groups = groups.len(), config = %loaded.path.display(), "Building");
    let outputs = pipeline.build_all(&groups);

    let total = outputs.len();
    let mut failures = Vec::new();
    let mut stdout = std::io::stdout().lock();
    for output in outputs {
        match output.result {
            Ok(css) if args.stdout => {
                writeln!(stdout, "/* {} */\n{}", output.name, css)?;
            }
            Ok(css) => {
                let path = write_group(&output_dir, &output.name, &css)
                    .with_context(|| format!("Failed to write group '{}'", output.name))?;
                info!(group = %output.name, path = %path.display(), "Wrote");
            }
            Err(e) => {
                error!(group = %output.name, error = %e, "Group failed");
                failures.push((output.name, e));
            }
        }
    }

    let failed = failures.len();
    if let Some((name, first)) = failures.into_iter().next() {
        return Err(anyhow::Error::new(first))
            .with_context(|| format!("Failed to build group '{}'", name))
            .with_context(|| format!("{} of {} groups failed", failed, total));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn project() -> tempfile::TempDir {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("css")).unwrap();
        fs::write(
            root.join("_cssbundle.yml"),
            "groups:\n  - {name: site, resources: [css/main.css]}\n  - {name: print, resources: [css/print.css]}\npost-processors: []\noutput-dir: dist\n",
        )
        .unwrap();
        fs::write(root.join("css/main.css"), "@import 'base.css';\n.main {}").unwrap();
        fs::write(root.join("css/base.css"), ".base {}").unwrap();
        fs::write(root.join("css/print.css"), ".print {}").unwrap();
        temp
    }

    #[test]
    fn test_build_writes_every_group() {
        let temp = project();
        execute(BuildArgs {
            config: Some(temp.path().join("_cssbundle.yml")),
            ..BuildArgs::default()
        })
        .unwrap();

        let site = fs::read_to_string(temp.path().join("dist/site.css")).unwrap();
        assert!(site.contains(".base {}"));
        assert!(site.contains(".main {}"));
        assert!(!site.contains("@import"));
        assert!(temp.path().join("dist/print.css").exists());
    }

    #[test]
    fn test_build_selected_group_to_custom_dir() {
        let temp = project();
        let out = temp.path().join("custom");
        execute(BuildArgs {
            config: Some(temp.path().join("_cssbundle.yml")),
            groups: vec!["print".to_string()],
            output_dir: Some(out.clone()),
            ..BuildArgs::default()
        })
        .unwrap();

        assert!(out.join("print.css").exists());
        assert!(!out.join("site.css").exists());
    }

    #[test]
    fn test_unknown_group_fails() {
        let temp = project();
        let err = execute(BuildArgs {
            config: Some(temp.path().join("_cssbundle.yml")),
            groups: vec!["nope".to_string()],
            ..BuildArgs::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("Unknown group 'nope'"));
    }

    #[test]
    fn test_failing_group_reports_chain() {
        let temp = project();
        fs::write(temp.path().join("css/print.css"), "@import 'missing.css';").unwrap();

        let err = execute(BuildArgs {
            config: Some(temp.path().join("_cssbundle.yml")),
            ..BuildArgs::default()
        })
        .unwrap_err();

        let chain: Vec<String> = err.chain().map(ToString::to_string).collect();
        assert_eq!(chain[0], "1 of 2 groups failed");
        assert_eq!(chain[1], "Failed to build group 'print'");
        assert!(chain[2].contains("css/missing.css"));
        // The other group is still written
        assert!(temp.path().join("dist/site.css").exists());
    }
}
