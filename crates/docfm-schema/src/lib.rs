//! # docfm-schema: Documentation Frontmatter Schema & Validation
//!
//! Declares the schema for the YAML frontmatter at the top of documentation
//! markdown files and validates documents against it.
//!
//! ## Schema (`schema`, `field`)
//!
//! [`FrontmatterSchema::new`] builds the field catalogue from a
//! [`VersionRegistry`](docfm_core::VersionRegistry) and a
//! [`LayoutRegistry`](docfm_core::LayoutRegistry). The schema is immutable
//! once built and exportable as JSON Schema for other tooling.
//!
//! ## Parsing (`parser`, `extract`, `validate`, `options`)
//!
//! [`Frontmatter::parse`] splits the `---` block from the body, validates
//! it with the `jsonschema` crate, rejects undeclared top-level keys unless
//! told not to, and returns the data or a structured
//! [`FrontmatterError`].
//!
//! ## Process-wide instance
//!
//! [`init`] builds one parser for the life of the process; [`frontmatter`]
//! and [`schema`] use it. Registries are read once, at `init`.
//!
//! ## Crate Policy
//!
//! - Depends only on `docfm-core` internally.
//! - Validation never stops at the first violation.
//! - No `.unwrap()` outside tests.

pub mod error;
pub mod extract;
pub mod field;
pub mod options;
pub mod parser;
pub mod schema;
pub mod validate;

use std::sync::{Arc, OnceLock};

use docfm_core::{LayoutRegistry, VersionRegistry};

pub use error::{FrontmatterError, ValidationViolations, Violation, ViolationKind};
pub use field::{Conformance, FieldDescriptor, FieldType, Properties};
pub use options::{ParseOptions, ParseOverrides};
pub use parser::{Frontmatter, ParsedFrontmatter};
pub use schema::{
    FrontmatterSchema, ALL_VERSIONS, GUIDE_TYPES, LAYOUT_MESSAGE, SEMVER_RANGE_MESSAGE,
};
pub use validate::CompiledSchema;

static GLOBAL: OnceLock<Frontmatter> = OnceLock::new();

/// Build the process-wide parser from the registries.
///
/// Only the first successful call builds anything; later calls return the
/// existing parser and ignore their arguments.
///
/// # Errors
///
/// Returns `FrontmatterError::ValidatorBuild` if the schema cannot be
/// compiled.
pub fn init(
    versions: &VersionRegistry,
    layouts: &LayoutRegistry,
) -> Result<&'static Frontmatter, FrontmatterError> {
    if let Some(existing) = GLOBAL.get() {
        return Ok(existing);
    }
    let parser = Frontmatter::from_registries(versions, layouts)?;
    Ok(GLOBAL.get_or_init(|| parser))
}

/// Parse `markdown` with the process-wide parser.
///
/// # Errors
///
/// Returns `FrontmatterError::NotInitialized` before [`init`], otherwise
/// whatever [`Frontmatter::parse`] returns.
pub fn frontmatter(
    markdown: &str,
    overrides: ParseOverrides,
) -> Result<ParsedFrontmatter, FrontmatterError> {
    GLOBAL
        .get()
        .ok_or(FrontmatterError::NotInitialized)?
        .parse(markdown, overrides)
}

/// The process-wide schema, once [`init`] has run.
pub fn schema() -> Option<Arc<FrontmatterSchema>> {
    GLOBAL.get().map(|parser| Arc::clone(parser.schema()))
}
