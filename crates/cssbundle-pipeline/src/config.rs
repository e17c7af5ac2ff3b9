//! Project configuration.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! A project is described by `_cssbundle.yml` (or `_cssbundle.yaml`):
//!
//! ```yaml
//! groups:
//!   - name: site
//!     resources: [styles/main.scss, styles/print.css]
//! pre-processors: [css-import]
//! post-processors: [scss]
//! minimize: false
//! output-dir: dist
//! load-paths: [styles/vendor]
//! ignore-missing-resources: false
//! ```
//!
//! Every key except `groups` is optional. Relative paths are resolved
//! against the directory holding the configuration file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use cssbundle_core::ResourceClassifier;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::pipeline::Group;

/// Configuration file names, in lookup order.
pub const CONFIG_FILE_NAMES: &[&str] = &["_cssbundle.yml", "_cssbundle.yaml"];

fn default_pre_processors() -> Vec<String> {
    vec!["css-import".to_string()]
}

fn default_post_processors() -> Vec<String> {
    vec!["scss".to_string()]
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Parsed `_cssbundle.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct BundleConfig {
    #[serde(default)]
    pub groups: Vec<GroupConfig>,

    /// Aliases of the processors applied to each resource
    #[serde(default = "default_pre_processors")]
    pub pre_processors: Vec<String>,

    /// Aliases of the processors applied to each merged group
    #[serde(default = "default_post_processors")]
    pub post_processors: Vec<String>,

    /// Run minimize processors (and append `css-compress` to the post chain
    /// if it holds no minimize processor)
    #[serde(default)]
    pub minimize: bool,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Extra Sass load paths
    #[serde(default)]
    pub load_paths: Vec<PathBuf>,

    /// Skip unreadable imports with a warning instead of failing the group
    #[serde(default)]
    pub ignore_missing_resources: bool,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            pre_processors: default_pre_processors(),
            post_processors: default_post_processors(),
            minimize: false,
            output_dir: default_output_dir(),
            load_paths: Vec::new(),
            ignore_missing_resources: false,
        }
    }
}

/// One named group of resources, bundled into `<name>.css`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupConfig {
    pub name: String,
    pub resources: Vec<String>,
}

impl BundleConfig {
    /// Parse configuration text; `path` is only used in error messages.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let config: BundleConfig = serde_yaml::from_str(content).map_err(|e| PipelineError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let mut seen = HashSet::new();
        for group in &self.groups {
            let invalid = |message: String| PipelineError::Config {
                path: path.to_path_buf(),
                message,
            };
            if group.name.trim().is_empty() {
                return Err(invalid("group with an empty name".to_string()));
            }
            if !seen.insert(group.name.as_str()) {
                return Err(invalid(format!("duplicate group '{}'", group.name)));
            }
            if group.resources.is_empty() {
                return Err(invalid(format!("group '{}' has no resources", group.name)));
            }
        }
        Ok(())
    }

    /// Groups in declaration order, with resources classified by
    /// `classifier`.
    pub fn groups(&self, classifier: &dyn ResourceClassifier) -> Vec<Group> {
        self.groups
            .iter()
            .map(|group| Group::from_config(group, classifier))
            .collect()
    }

    /// The groups named in `names`, in the order given. An empty `names`
    /// selects every group.
    pub fn select_groups(
        &self,
        names: &[String],
        classifier: &dyn ResourceClassifier,
    ) -> Result<Vec<Group>> {
        if names.is_empty() {
            return Ok(self.groups(classifier));
        }
        names
            .iter()
            .map(|name| {
                self.groups
                    .iter()
                    .find(|group| &group.name == name)
                    .map(|group| Group::from_config(group, classifier))
                    .ok_or_else(|| PipelineError::UnknownGroup(name.clone()))
            })
            .collect()
    }
}

/// A configuration file together with where it was found.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Path of the configuration file
    pub path: PathBuf,
    /// Directory holding the configuration file
    pub root: PathBuf,
    pub config: BundleConfig,
}

impl LoadedConfig {
    /// Load and validate the configuration file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| PipelineError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = BundleConfig::parse(&content, path)?;
        let root = path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        tracing::debug!(path = %path.display(), groups = config.groups.len(), "Loaded configuration");
        Ok(Self {
            path: path.to_path_buf(),
            root,
            config,
        })
    }

    /// Search for a configuration file in `start_dir` and its parents.
    ///
    /// Returns `Ok(None)` when no directory up to the filesystem root holds
    /// one.
    pub fn discover(start_dir: impl AsRef<Path>) -> Result<Option<Self>> {
        let mut current = start_dir.as_ref().to_path_buf();

        loop {
            for name in CONFIG_FILE_NAMES {
                let config_path = current.join(name);
                if config_path.is_file() {
                    return Self::load(config_path).map(Some);
                }
            }

            // Move to parent directory
            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                return Ok(None);
            }
        }
    }

    /// Output directory, resolved against the project root.
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.config.output_dir)
    }
}
