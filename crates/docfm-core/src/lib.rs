//! # docfm-core: Foundational Types for docfm
//!
//! Leaf crate of the docfm workspace. Defines the collaborators the
//! frontmatter schema is assembled from:
//!
//! - [`VersionRegistry`] and [`LayoutRegistry`]: the key sets of known
//!   version identifiers and layout names. Both are plain values handed to
//!   the schema builder; nothing here watches the filesystem for changes.
//! - [`semver_range`]: syntactic validation of node-style SemVer ranges
//!   (`>=1.0.0 <2.0.0`, `~2.22 || >=3.0`) on top of the `semver` crate.
//! - [`url_format`]: well-formed URL check used by `href` fields.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `docfm-*` crates.
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests.

pub mod error;
pub mod registry;
pub mod semver_range;
pub mod url_format;

pub use error::DocfmError;
pub use registry::{LayoutRegistry, VersionRegistry};
pub use semver_range::is_valid_range;
pub use url_format::is_well_formed_url;
