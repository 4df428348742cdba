//! # Error Types
//!
//! Errors raised while assembling the inputs of the frontmatter schema.
//! Validation failures of individual documents live in `docfm-schema`;
//! this crate only fails when a registry source cannot be read.

use thiserror::Error;

/// Top-level error type for docfm registry loading.
#[derive(Error, Debug)]
pub enum DocfmError {
    /// A registry file or directory could not be loaded.
    #[error("registry load error for '{path}': {reason}")]
    RegistryLoad {
        /// Path of the registry source.
        path: String,
        /// Reason the source could not be loaded.
        reason: String,
    },

    /// A registry document parsed but did not have the expected shape.
    #[error("malformed registry: {0}")]
    MalformedRegistry(String),

    /// YAML deserialization error.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
