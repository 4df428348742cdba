//! # Parse Options
//!
//! [`ParseOptions`] is the full option set a parse runs with;
//! [`ParseOverrides`] is what a caller supplies. Overrides are combined with
//! the defaults by a **shallow** merge: each override that is present
//! replaces the corresponding default wholesale. In particular an
//! overriding schema replaces the default schema entirely; its fields are
//! never combined with the default catalogue.

use std::path::PathBuf;
use std::sync::Arc;

use crate::schema::FrontmatterSchema;

/// Options a parse runs with.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Schema the frontmatter is validated against.
    pub schema: Arc<FrontmatterSchema>,
    /// Reject top-level keys the schema does not declare.
    pub validate_key_names: bool,
    /// Accepted for compatibility; key order is not checked.
    pub validate_key_order: bool,
    /// Source file, attached to errors.
    pub filepath: Option<PathBuf>,
}

impl ParseOptions {
    /// The default options for `schema`: key names validated, key order not.
    pub fn defaults(schema: Arc<FrontmatterSchema>) -> Self {
        Self {
            schema,
            validate_key_names: true,
            validate_key_order: false,
            filepath: None,
        }
    }
}

/// Caller-supplied partial options. Absent fields keep their default.
#[derive(Debug, Clone, Default)]
pub struct ParseOverrides {
    pub schema: Option<Arc<FrontmatterSchema>>,
    pub validate_key_names: Option<bool>,
    pub validate_key_order: Option<bool>,
    pub filepath: Option<PathBuf>,
}

impl ParseOverrides {
    /// No overrides; parse with the defaults.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn schema(mut self, schema: Arc<FrontmatterSchema>) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn validate_key_names(mut self, enabled: bool) -> Self {
        self.validate_key_names = Some(enabled);
        self
    }

    pub fn validate_key_order(mut self, enabled: bool) -> Self {
        self.validate_key_order = Some(enabled);
        self
    }

    pub fn filepath(mut self, path: impl Into<PathBuf>) -> Self {
        self.filepath = Some(path.into());
        self
    }

    /// Shallow-merge these overrides over `defaults`.
    pub fn merge_over(self, defaults: &ParseOptions) -> ParseOptions {
        ParseOptions {
            schema: self.schema.unwrap_or_else(|| Arc::clone(&defaults.schema)),
            validate_key_names: self
                .validate_key_names
                .unwrap_or(defaults.validate_key_names),
            validate_key_order: self
                .validate_key_order
                .unwrap_or(defaults.validate_key_order),
            filepath: self.filepath.or_else(|| defaults.filepath.clone()),
        }
    }
}
