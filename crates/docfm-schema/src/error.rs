//! # Frontmatter Errors
//!
//! Every failure of a parse call surfaces as a [`FrontmatterError`].
//! Schema violations are collected, never short-circuited, so one call
//! reports everything wrong with a page.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error raised by the frontmatter parser.
#[derive(Error, Debug)]
pub enum FrontmatterError {
    /// The block opened with `---` but never closed.
    #[error("frontmatter block in {} is missing its closing `---` delimiter", origin(.filepath))]
    UnclosedBlock {
        /// Source file, when the caller supplied one.
        filepath: Option<PathBuf>,
    },

    /// The block is not YAML, or not a YAML mapping.
    #[error("invalid frontmatter YAML in {}: {reason}", origin(.filepath))]
    InvalidYaml {
        /// Source file, when the caller supplied one.
        filepath: Option<PathBuf>,
        /// Parser diagnostic.
        reason: String,
    },

    /// The frontmatter did not conform to the schema.
    #[error("frontmatter validation failed for {}:\n{violations}", origin(.filepath))]
    ValidationFailed {
        /// Source file, when the caller supplied one.
        filepath: Option<PathBuf>,
        /// Every violation found.
        violations: ValidationViolations,
    },

    /// The schema could not be compiled into a validator.
    #[error("validator build error: {reason}")]
    ValidatorBuild {
        /// Compiler diagnostic.
        reason: String,
    },

    /// The process-wide parser was used before `docfm_schema::init`.
    #[error("frontmatter parser used before initialization")]
    NotInitialized,
}

impl FrontmatterError {
    /// The violations carried by a `ValidationFailed` error.
    pub fn violations(&self) -> Option<&ValidationViolations> {
        match self {
            FrontmatterError::ValidationFailed { violations, .. } => Some(violations),
            _ => None,
        }
    }

    /// The source file the error refers to, if known.
    pub fn filepath(&self) -> Option<&Path> {
        match self {
            FrontmatterError::UnclosedBlock { filepath }
            | FrontmatterError::InvalidYaml { filepath, .. }
            | FrontmatterError::ValidationFailed { filepath, .. } => filepath.as_deref(),
            _ => None,
        }
    }
}

fn origin(filepath: &Option<PathBuf>) -> String {
    match filepath {
        Some(path) => format!("'{}'", path.display()),
        None => "<input>".to_string(),
    }
}

/// Category of a schema violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// A required field is absent.
    Required,
    /// The value has the wrong type.
    Type,
    /// The value is not one of the allowed literals.
    Enum,
    /// A number is outside its bounds.
    Bounds,
    /// A custom conformance predicate failed (SemVer range, URL).
    Conformance,
    /// A top-level key is not declared by the schema.
    UnknownKey,
    /// Any other schema keyword.
    Other,
}

impl ViolationKind {
    /// Classify by the JSON Schema keyword that failed.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "required" => ViolationKind::Required,
            "type" => ViolationKind::Type,
            "enum" | "const" => ViolationKind::Enum,
            "minimum" | "maximum" | "exclusiveMinimum" | "exclusiveMaximum" => {
                ViolationKind::Bounds
            }
            "format" => ViolationKind::Conformance,
            "additionalProperties" => ViolationKind::UnknownKey,
            _ => ViolationKind::Other,
        }
    }
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Dotted path of the offending property (`externalProducts.cli.href`).
    pub property: String,
    /// JSON Pointer path to the offending value in the frontmatter.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// What kind of check failed.
    pub kind: ViolationKind,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.property.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.property, self.message)
        }
    }
}

/// Every violation found in one frontmatter block, in report order:
/// schema checks first, then undeclared keys.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    pub(crate) fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Violations reported against `property`.
    pub fn for_property<'a>(&'a self, property: &'a str) -> impl Iterator<Item = &'a Violation> {
        self.violations.iter().filter(move |v| v.property == property)
    }

    /// Whether any violation of `kind` was reported against `property`.
    pub fn has(&self, property: &str, kind: ViolationKind) -> bool {
        self.for_property(property).any(|v| v.kind == kind)
    }

    /// Distinct offending properties, in first-reported order.
    pub fn properties(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for v in &self.violations {
            if !seen.contains(&v.property.as_str()) {
                seen.push(&v.property);
            }
        }
        seen
    }
}

impl<'a> IntoIterator for &'a ValidationViolations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.violations.iter().map(Violation::to_string).collect();
        f.write_str(&lines.join("\n"))
    }
}
