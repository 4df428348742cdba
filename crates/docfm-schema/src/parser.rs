//! # Frontmatter Parser
//!
//! [`Frontmatter`] owns the default options and a validator compiled from
//! the default schema. [`Frontmatter::parse`] merges caller overrides over
//! the defaults, splits the document, validates the block and returns the
//! data with the body, or an error describing everything wrong with it.
//!
//! Key-order validation is accepted as an option but not performed.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use docfm_core::{LayoutRegistry, VersionRegistry};

use crate::error::{FrontmatterError, ValidationViolations};
use crate::extract;
use crate::options::{ParseOptions, ParseOverrides};
use crate::schema::FrontmatterSchema;
use crate::validate::{unknown_key_violations, CompiledSchema};

/// Validated frontmatter plus the document body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedFrontmatter {
    /// The frontmatter fields, as written.
    pub data: Map<String, Value>,
    /// The document with the frontmatter block stripped.
    pub content: String,
}

impl ParsedFrontmatter {
    /// Raw value of a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// String value of a field, if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// The page title.
    pub fn title(&self) -> Option<&str> {
        self.get_str("title")
    }

    /// Whether the page applies to all versions (`versions: "*"`).
    pub fn applies_to_all_versions(&self) -> bool {
        self.get_str("versions") == Some(crate::schema::ALL_VERSIONS)
    }

    /// Deserialize the frontmatter into a caller-defined type.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.data.clone()))
    }
}

/// Frontmatter parser bound to a default schema.
#[derive(Debug)]
pub struct Frontmatter {
    defaults: ParseOptions,
    compiled: CompiledSchema,
}

impl Frontmatter {
    /// Create a parser whose default schema is `schema`.
    ///
    /// # Errors
    ///
    /// Returns `FrontmatterError::ValidatorBuild` if the schema cannot be
    /// compiled.
    pub fn new(schema: FrontmatterSchema) -> Result<Self, FrontmatterError> {
        let schema = Arc::new(schema);
        let compiled = CompiledSchema::compile(Arc::clone(&schema))?;
        Ok(Self {
            defaults: ParseOptions::defaults(schema),
            compiled,
        })
    }

    /// Build the documentation schema from the registries and wrap it.
    pub fn from_registries(
        versions: &VersionRegistry,
        layouts: &LayoutRegistry,
    ) -> Result<Self, FrontmatterError> {
        Self::new(FrontmatterSchema::new(versions, layouts))
    }

    /// The default schema.
    pub fn schema(&self) -> &Arc<FrontmatterSchema> {
        &self.defaults.schema
    }

    /// The default options.
    pub fn defaults(&self) -> &ParseOptions {
        &self.defaults
    }

    /// Parse and validate the frontmatter of `markdown`.
    ///
    /// `overrides` are shallow-merged over the defaults. A schema override
    /// is compiled for this call only.
    ///
    /// # Errors
    ///
    /// - `UnclosedBlock` if the block has no closing delimiter;
    /// - `InvalidYaml` if the block is not a YAML mapping;
    /// - `ValidationFailed` with every violation found otherwise;
    /// - `ValidatorBuild` if an overriding schema cannot be compiled.
    pub fn parse(
        &self,
        markdown: &str,
        overrides: ParseOverrides,
    ) -> Result<ParsedFrontmatter, FrontmatterError> {
        let options = overrides.merge_over(&self.defaults);

        let overridden;
        let compiled = if Arc::ptr_eq(&options.schema, self.compiled.schema()) {
            &self.compiled
        } else {
            overridden = CompiledSchema::compile(Arc::clone(&options.schema))?;
            &overridden
        };

        read_frontmatter(markdown, &options, compiled)
    }
}

/// Split, parse and validate one document against `compiled`.
fn read_frontmatter(
    markdown: &str,
    options: &ParseOptions,
    compiled: &CompiledSchema,
) -> Result<ParsedFrontmatter, FrontmatterError> {
    let split = extract::split(markdown).map_err(|_| FrontmatterError::UnclosedBlock {
        filepath: options.filepath.clone(),
    })?;

    let data = match split.yaml {
        Some(yaml) => {
            extract::parse_block(yaml).map_err(|reason| FrontmatterError::InvalidYaml {
                filepath: options.filepath.clone(),
                reason,
            })?
        }
        None => Map::new(),
    };

    let mut violations = compiled.violations(&Value::Object(data.clone()));

    if options.validate_key_names {
        violations.extend(unknown_key_violations(&options.schema, &data));
    }

    if options.validate_key_order {
        tracing::debug!(
            filepath = ?options.filepath,
            "key order validation requested but not performed"
        );
    }

    if !violations.is_empty() {
        tracing::debug!(
            filepath = ?options.filepath,
            violations = violations.len(),
            "frontmatter failed validation"
        );
        return Err(FrontmatterError::ValidationFailed {
            filepath: options.filepath.clone(),
            violations: ValidationViolations::new(violations),
        });
    }

    Ok(ParsedFrontmatter {
        data,
        content: split.content.to_string(),
    })
}
