//! # docfm-cli
//!
//! Command-line front end for the documentation frontmatter schema.
//!
//! ## Subcommands
//!
//! - `lint`: validate the frontmatter of markdown files
//! - `schema`: print the JSON Schema document
//! - `translatable`: list translatable field names
//!
//! Handlers return an exit code: `0` success, `1` validation failures.
//! Operational errors propagate as `anyhow::Error` and exit with `2`.

pub mod config;
pub mod lint;
pub mod schema;
