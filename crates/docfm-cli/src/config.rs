//! # Configuration
//!
//! `docfm.yaml` tells the CLI where the registries live and which parse
//! options to use. Every setting can be overridden from the command line.
//!
//! ```yaml
//! layouts_dir: layouts
//! versions_file: lib/all-versions.yml
//! versions: [github-ae@latest]   # added to those from versions_file
//! validate_key_names: true
//! ```
//!
//! Relative paths are resolved against the directory holding the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};

use docfm_core::{LayoutRegistry, VersionRegistry};

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "docfm.yaml";

/// Settings read from `docfm.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocfmConfig {
    /// Directory of layout templates.
    #[serde(default)]
    pub layouts_dir: Option<PathBuf>,
    /// YAML/JSON file whose top-level keys are the version identifiers.
    #[serde(default)]
    pub versions_file: Option<PathBuf>,
    /// Extra version identifiers.
    #[serde(default)]
    pub versions: Vec<String>,
    /// Extra layout names.
    #[serde(default)]
    pub layouts: Vec<String>,
    /// Reject undeclared frontmatter keys.
    #[serde(default = "default_true")]
    pub validate_key_names: bool,
    /// Accepted, not enforced.
    #[serde(default)]
    pub validate_key_order: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DocfmConfig {
    fn default() -> Self {
        Self {
            layouts_dir: None,
            versions_file: None,
            versions: Vec::new(),
            layouts: Vec::new(),
            validate_key_names: true,
            validate_key_order: false,
        }
    }
}

impl DocfmConfig {
    /// Parse a config document. Relative paths stay relative.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).context("invalid docfm configuration")
    }

    /// Load `path`, resolving relative paths against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("in config file {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(config.resolved_against(base))
    }

    /// Load the explicit config, or `docfm.yaml` in `cwd` if it exists, or
    /// fall back to defaults.
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "loading config");
            return Self::load(path);
        }
        let candidate = cwd.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "loading discovered config");
            return Self::load(&candidate);
        }
        tracing::debug!("no config file; using defaults");
        Ok(Self::default())
    }

    fn resolved_against(mut self, base: &Path) -> Self {
        self.layouts_dir = self.layouts_dir.map(|p| resolve(base, p));
        self.versions_file = self.versions_file.map(|p| resolve(base, p));
        self
    }

    /// Build both registries from the configured sources.
    pub fn registries(&self) -> Result<(VersionRegistry, LayoutRegistry)> {
        let mut versions = match &self.versions_file {
            Some(path) => VersionRegistry::from_file(path)?,
            None => VersionRegistry::new(),
        };
        for id in &self.versions {
            versions.insert(id.as_str());
        }

        let mut layouts = match &self.layouts_dir {
            Some(dir) => LayoutRegistry::from_dir(dir)?,
            None => LayoutRegistry::new(),
        };
        for name in &self.layouts {
            layouts.insert(name.as_str());
        }

        tracing::info!(
            versions = versions.len(),
            layouts = layouts.len(),
            "loaded registries"
        );
        Ok((versions, layouts))
    }
}

fn resolve(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Registry sources given on the command line.
#[derive(Args, Debug, Clone, Default)]
pub struct RegistryArgs {
    /// Directory of layout templates (overrides `layouts_dir`).
    #[arg(long, value_name = "DIR")]
    pub layouts_dir: Option<PathBuf>,

    /// File listing version identifiers (overrides `versions_file`).
    #[arg(long, value_name = "FILE")]
    pub versions_file: Option<PathBuf>,

    /// Additional version identifier. Repeatable.
    #[arg(long = "version-id", value_name = "ID")]
    pub versions: Vec<String>,

    /// Additional layout name. Repeatable.
    #[arg(long = "layout", value_name = "NAME")]
    pub layouts: Vec<String>,
}

impl RegistryArgs {
    /// Apply these flags over `config`.
    pub fn apply(&self, mut config: DocfmConfig) -> DocfmConfig {
        if let Some(dir) = &self.layouts_dir {
            config.layouts_dir = Some(dir.clone());
        }
        if let Some(file) = &self.versions_file {
            config.versions_file = Some(file.clone());
        }
        config.versions.extend(self.versions.iter().cloned());
        config.layouts.extend(self.layouts.iter().cloned());
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_default() {
        let config = DocfmConfig::from_yaml_str("").unwrap();
        assert_eq!(config, DocfmConfig::default());
        assert!(config.validate_key_names);
        assert!(!config.validate_key_order);
    }

    #[test]
    fn unknown_settings_are_rejected() {
        assert!(DocfmConfig::from_yaml_str("layout_dir: typo\n").is_err());
    }

    #[test]
    fn load_resolves_paths_relative_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(
            &path,
            "layouts_dir: layouts\nversions_file: /abs/versions.yml\nvalidate_key_names: false\n",
        )
        .unwrap();

        let config = DocfmConfig::load(&path).unwrap();
        assert_eq!(config.layouts_dir, Some(dir.path().join("layouts")));
        assert_eq!(config.versions_file, Some(PathBuf::from("/abs/versions.yml")));
        assert!(!config.validate_key_names);
    }

    #[test]
    fn discover_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DocfmConfig::discover(None, dir.path()).unwrap();
        assert_eq!(config, DocfmConfig::default());
    }

    #[test]
    fn discover_finds_config_in_cwd() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "versions: [free-pro-team@latest]\n",
        )
        .unwrap();
        let config = DocfmConfig::discover(None, dir.path()).unwrap();
        assert_eq!(config.versions, vec!["free-pro-team@latest"]);
    }

    #[test]
    fn discover_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(DocfmConfig::discover(Some(&missing), dir.path()).is_err());
    }

    #[test]
    fn registries_merge_file_and_inline_sources() {
        let dir = tempfile::tempdir().unwrap();
        let layouts_dir = dir.path().join("layouts");
        std::fs::create_dir(&layouts_dir).unwrap();
        std::fs::write(layouts_dir.join("default.html"), "").unwrap();
        let versions_file = dir.path().join("versions.yml");
        std::fs::write(&versions_file, "free-pro-team@latest: {}\n").unwrap();

        let config = DocfmConfig {
            layouts_dir: Some(layouts_dir),
            versions_file: Some(versions_file),
            versions: vec!["github-ae@latest".to_string()],
            layouts: vec!["graphql-explorer".to_string()],
            ..DocfmConfig::default()
        };
        let (versions, layouts) = config.registries().unwrap();
        assert_eq!(versions.ids(), &["free-pro-team@latest", "github-ae@latest"]);
        assert_eq!(layouts.names(), &["default", "graphql-explorer"]);
    }

    #[test]
    fn flags_override_config() {
        let args = RegistryArgs {
            layouts_dir: Some(PathBuf::from("/other/layouts")),
            versions_file: None,
            versions: vec!["enterprise-server@3.0".to_string()],
            layouts: Vec::new(),
        };
        let config = DocfmConfig {
            layouts_dir: Some(PathBuf::from("/config/layouts")),
            versions: vec!["free-pro-team@latest".to_string()],
            ..DocfmConfig::default()
        };
        let merged = args.apply(config);
        assert_eq!(merged.layouts_dir, Some(PathBuf::from("/other/layouts")));
        assert_eq!(
            merged.versions,
            vec!["free-pro-team@latest", "enterprise-server@3.0"]
        );
    }
}
