//! # Version and Layout Registries
//!
//! The frontmatter schema depends on two key sets that live outside the
//! schema itself: the known version identifiers (`free-pro-team@latest`,
//! `enterprise-server@3.0`, ...) and the names of the layout templates.
//!
//! Both are captured here as insertion-ordered, de-duplicated sets of
//! strings. The schema builder takes them as explicit arguments, so a
//! schema is a pure function of the registries it was built from. A
//! registry changing after the schema was built has no effect on that
//! schema.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::DocfmError;

/// Layout template extensions recognised by [`LayoutRegistry::from_dir`].
pub const LAYOUT_EXTENSIONS: &[&str] = &["html", "md"];

/// Insertion-ordered set of registry keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
struct KeySet {
    keys: Vec<String>,
}

impl KeySet {
    fn insert(&mut self, key: String) -> bool {
        if self.keys.contains(&key) {
            return false;
        }
        self.keys.push(key);
        true
    }
}

impl From<Vec<String>> for KeySet {
    fn from(keys: Vec<String>) -> Self {
        let mut set = KeySet::default();
        for key in keys {
            set.insert(key);
        }
        set
    }
}

impl From<KeySet> for Vec<String> {
    fn from(set: KeySet) -> Self {
        set.keys
    }
}

// ---------------------------------------------------------------------------
// VersionRegistry
// ---------------------------------------------------------------------------

/// The set of known documentation version identifiers.
///
/// Only the identifiers are consumed; whatever metadata a version carries
/// elsewhere (release dates, plan names) is not needed to build the schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionRegistry(KeySet);

impl VersionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a version identifier. Returns `false` if it was already present.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.0.insert(id.into())
    }

    /// Whether `id` is a known version identifier.
    pub fn contains(&self, id: &str) -> bool {
        self.0.keys.iter().any(|k| k == id)
    }

    /// Identifiers in insertion order.
    pub fn ids(&self) -> &[String] {
        &self.0.keys
    }

    /// Iterate identifiers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.keys.iter().map(String::as_str)
    }

    /// Number of identifiers.
    pub fn len(&self) -> usize {
        self.0.keys.len()
    }

    /// Returns true if the registry holds no identifiers.
    pub fn is_empty(&self) -> bool {
        self.0.keys.is_empty()
    }

    /// Parse a registry from YAML.
    ///
    /// Accepts either a mapping keyed by version identifier (the values are
    /// ignored) or a plain sequence of identifier strings. An empty document
    /// yields an empty registry.
    ///
    /// # Errors
    ///
    /// Returns `DocfmError::Yaml` if the input is not YAML and
    /// `DocfmError::MalformedRegistry` if it has any other shape, or a key
    /// that is not a string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DocfmError> {
        let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        let mut registry = Self::new();

        match value {
            serde_yaml::Value::Null => {}
            serde_yaml::Value::Mapping(map) => {
                for (key, _) in map {
                    registry.insert(yaml_key_to_string(&key)?);
                }
            }
            serde_yaml::Value::Sequence(seq) => {
                for item in seq {
                    registry.insert(yaml_key_to_string(&item)?);
                }
            }
            other => {
                return Err(DocfmError::MalformedRegistry(format!(
                    "expected a mapping or sequence of version identifiers, found {}",
                    yaml_kind(&other)
                )))
            }
        }

        tracing::debug!(count = registry.len(), "parsed version registry");
        Ok(registry)
    }

    /// Load a registry from a YAML or JSON file. JSON is a subset of YAML,
    /// so both go through [`VersionRegistry::from_yaml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DocfmError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| DocfmError::RegistryLoad {
                path: path.display().to_string(),
                reason: format!("cannot read file: {e}"),
            })?;
        Self::from_yaml_str(&content).map_err(|e| DocfmError::RegistryLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

impl<S: Into<String>> FromIterator<S> for VersionRegistry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut registry = Self::new();
        for id in iter {
            registry.insert(id);
        }
        registry
    }
}

impl fmt::Display for VersionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.keys.join(", "))
    }
}

// ---------------------------------------------------------------------------
// LayoutRegistry
// ---------------------------------------------------------------------------

/// The set of layout template names a page may select with `layout:`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutRegistry(KeySet);

impl LayoutRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layout name. Returns `false` if it was already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.0.insert(name.into())
    }

    /// Whether `name` is a known layout.
    pub fn contains(&self, name: &str) -> bool {
        self.0.keys.iter().any(|k| k == name)
    }

    /// Layout names in insertion order.
    pub fn names(&self) -> &[String] {
        &self.0.keys
    }

    /// Iterate layout names in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.keys.iter().map(String::as_str)
    }

    /// Number of layouts.
    pub fn len(&self) -> usize {
        self.0.keys.len()
    }

    /// Returns true if the registry holds no layouts.
    pub fn is_empty(&self) -> bool {
        self.0.keys.is_empty()
    }

    /// Build a registry by walking a layouts directory.
    ///
    /// Every `.html` or `.md` file below `dir` contributes its basename
    /// without the final extension (`layouts/product-landing.html` becomes
    /// `product-landing`). Files whose name contains `README` are skipped.
    /// Files are visited in sorted path order so the result is deterministic.
    ///
    /// # Errors
    ///
    /// Returns `DocfmError::RegistryLoad` if `dir` cannot be read.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, DocfmError> {
        let dir = dir.as_ref();
        let mut files = Vec::new();
        collect_layout_files(dir, &mut files).map_err(|e| DocfmError::RegistryLoad {
            path: dir.display().to_string(),
            reason: format!("cannot read layouts directory: {e}"),
        })?;
        files.sort();

        let mut registry = Self::new();
        for path in files {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                registry.insert(stem);
            }
        }

        tracing::debug!(
            dir = %dir.display(),
            count = registry.len(),
            "loaded layout registry"
        );
        Ok(registry)
    }
}

impl<S: Into<String>> FromIterator<S> for LayoutRegistry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut registry = Self::new();
        for name in iter {
            registry.insert(name);
        }
        registry
    }
}

fn collect_layout_files(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_layout_files(&path, out)?;
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.contains("README") {
            continue;
        }
        let has_layout_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| LAYOUT_EXTENSIONS.contains(&ext));
        if has_layout_ext {
            out.push(path);
        }
    }
    Ok(())
}

fn yaml_key_to_string(value: &serde_yaml::Value) -> Result<String, DocfmError> {
    match value {
        serde_yaml::Value::String(s) => Ok(s.clone()),
        other => Err(DocfmError::MalformedRegistry(format!(
            "registry keys must be strings, found {}",
            yaml_kind(other)
        ))),
    }
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "boolean",
        serde_yaml::Value::Number(_) => "number",
        serde_yaml::Value::String(_) => "string",
        serde_yaml::Value::Sequence(_) => "sequence",
        serde_yaml::Value::Mapping(_) => "mapping",
        serde_yaml::Value::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_registry_deduplicates_and_keeps_order() {
        let registry: VersionRegistry = [
            "free-pro-team@latest",
            "enterprise-server@3.0",
            "free-pro-team@latest",
        ]
        .into_iter()
        .collect();
        assert_eq!(
            registry.ids(),
            &["free-pro-team@latest", "enterprise-server@3.0"]
        );
        assert!(registry.contains("enterprise-server@3.0"));
        assert!(!registry.contains("github-ae@latest"));
    }

    #[test]
    fn version_registry_from_mapping() {
        let yaml = r#"
free-pro-team@latest:
  plan: free-pro-team
enterprise-server@2.22:
  plan: enterprise-server
"#;
        let registry = VersionRegistry::from_yaml_str(yaml).unwrap();
        assert_eq!(
            registry.ids(),
            &["free-pro-team@latest", "enterprise-server@2.22"]
        );
    }

    #[test]
    fn version_registry_from_sequence() {
        let registry =
            VersionRegistry::from_yaml_str("- github-ae@latest\n- enterprise-server@3.0\n")
                .unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn version_registry_empty_document() {
        let registry = VersionRegistry::from_yaml_str("").unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn version_registry_rejects_scalar() {
        let err = VersionRegistry::from_yaml_str("just-a-string").unwrap_err();
        assert!(matches!(err, DocfmError::MalformedRegistry(_)), "got: {err}");
    }

    #[test]
    fn version_registry_rejects_non_string_keys() {
        let err = VersionRegistry::from_yaml_str("- 1\n- 2\n").unwrap_err();
        assert!(err.to_string().contains("must be strings"));
    }

    #[test]
    fn version_registry_from_missing_file() {
        let err = VersionRegistry::from_file("/definitely/not/here.yml").unwrap_err();
        assert!(matches!(err, DocfmError::RegistryLoad { .. }));
    }

    #[test]
    fn layout_registry_walks_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("default.html"), "").unwrap();
        std::fs::write(dir.path().join("product-landing.html"), "").unwrap();
        std::fs::write(dir.path().join("README.md"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("release-notes.md"), "").unwrap();

        let registry = LayoutRegistry::from_dir(dir.path()).unwrap();
        assert_eq!(registry.len(), 3);
        assert!(registry.contains("default"));
        assert!(registry.contains("product-landing"));
        assert!(registry.contains("release-notes"));
        assert!(!registry.contains("README"));
        assert!(!registry.contains("notes"));
    }

    #[test]
    fn layout_registry_missing_dir() {
        let err = LayoutRegistry::from_dir("/definitely/not/a/layouts/dir").unwrap_err();
        assert!(matches!(err, DocfmError::RegistryLoad { .. }));
    }

    #[test]
    fn registries_deserialize_from_lists() {
        let layouts: LayoutRegistry =
            serde_yaml::from_str("[default, graphql-explorer, default]").unwrap();
        assert_eq!(layouts.names(), &["default", "graphql-explorer"]);
    }
}
