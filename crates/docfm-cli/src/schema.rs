//! # Schema Subcommands
//!
//! Export the frontmatter schema for other tooling: the full JSON Schema
//! document, or just the names of translatable fields.

use anyhow::Result;
use clap::Args;

use docfm_schema::FrontmatterSchema;

use crate::config::{DocfmConfig, RegistryArgs};

/// Arguments for `docfm schema` and `docfm translatable`.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Emit compact JSON instead of pretty-printed.
    #[arg(long)]
    pub compact: bool,

    #[command(flatten)]
    pub registries: RegistryArgs,
}

fn build_schema(args: &SchemaArgs, config: DocfmConfig) -> Result<FrontmatterSchema> {
    let config = args.registries.apply(config);
    let (versions, layouts) = config.registries()?;
    Ok(FrontmatterSchema::new(&versions, &layouts))
}

/// Render the JSON Schema document.
pub fn render_schema(schema: &FrontmatterSchema, compact: bool) -> Result<String> {
    let json = schema.to_json_schema();
    let text = if compact {
        serde_json::to_string(&json)?
    } else {
        serde_json::to_string_pretty(&json)?
    };
    Ok(text)
}

/// Print the JSON Schema document.
pub fn run_schema(args: &SchemaArgs, config: DocfmConfig) -> Result<u8> {
    let schema = build_schema(args, config)?;
    println!("{}", render_schema(&schema, args.compact)?);
    Ok(0)
}

/// Print translatable field names, one per line.
pub fn run_translatable(args: &SchemaArgs, config: DocfmConfig) -> Result<u8> {
    let schema = build_schema(args, config)?;
    for field in schema.translatable_fields() {
        println!("{field}");
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_schema_is_json() {
        let args = SchemaArgs {
            compact: true,
            registries: RegistryArgs {
                versions: vec!["free-pro-team@latest".to_string()],
                layouts: vec!["default".to_string()],
                ..RegistryArgs::default()
            },
        };
        let schema = build_schema(&args, DocfmConfig::default()).unwrap();
        let text = render_schema(&schema, true).unwrap();
        assert!(!text.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value["properties"]["layout"]["enum"],
            serde_json::json!(["default", false])
        );
        assert!(value["properties"]["versions"]["properties"]["free-pro-team@latest"].is_object());
    }
}
