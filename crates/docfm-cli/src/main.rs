//! # docfm CLI entry point
//!
//! Parses command-line arguments, loads `docfm.yaml`, and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use docfm_cli::config::DocfmConfig;
use docfm_cli::lint::{run_lint, LintArgs};
use docfm_cli::schema::{run_schema, run_translatable, SchemaArgs};

/// Documentation frontmatter linter.
///
/// Validates the YAML frontmatter of documentation pages against the
/// content schema and exports that schema for other tooling.
#[derive(Parser, Debug)]
#[command(name = "docfm", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file (default: ./docfm.yaml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate the frontmatter of markdown files.
    Lint(LintArgs),

    /// Print the frontmatter schema as JSON Schema.
    Schema(SchemaArgs),

    /// List the frontmatter fields whose values are translated.
    Translatable(SchemaArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let result = DocfmConfig::discover(cli.config.as_deref(), &cwd).and_then(|config| {
        match &cli.command {
            Commands::Lint(args) => run_lint(args, config),
            Commands::Schema(args) => run_schema(args, config),
            Commands::Translatable(args) => run_translatable(args, config),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_lint_paths() {
        let cli = Cli::try_parse_from(["docfm", "lint", "content", "data/page.md"]).unwrap();
        let Commands::Lint(args) = cli.command else {
            panic!("expected lint");
        };
        assert_eq!(
            args.paths,
            vec![PathBuf::from("content"), PathBuf::from("data/page.md")]
        );
        assert!(!args.no_validate_key_names);
        assert!(!args.validate_key_order);
    }

    #[test]
    fn cli_parse_lint_requires_a_path() {
        assert!(Cli::try_parse_from(["docfm", "lint"]).is_err());
    }

    #[test]
    fn cli_parse_lint_flags() {
        let cli = Cli::try_parse_from([
            "docfm",
            "lint",
            "content",
            "--no-validate-key-names",
            "--validate-key-order",
            "--layouts-dir",
            "layouts",
            "--version-id",
            "free-pro-team@latest",
            "--version-id",
            "github-ae@latest",
        ])
        .unwrap();
        let Commands::Lint(args) = cli.command else {
            panic!("expected lint");
        };
        assert!(args.no_validate_key_names);
        assert!(args.validate_key_order);
        assert_eq!(args.registries.layouts_dir, Some(PathBuf::from("layouts")));
        assert_eq!(
            args.registries.versions,
            vec!["free-pro-team@latest", "github-ae@latest"]
        );
    }

    #[test]
    fn cli_parse_global_options() {
        let cli =
            Cli::try_parse_from(["docfm", "-vv", "schema", "--config", "site/docfm.yaml"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("site/docfm.yaml")));
        assert!(matches!(cli.command, Commands::Schema(_)));
    }

    #[test]
    fn cli_parse_translatable() {
        let cli = Cli::try_parse_from(["docfm", "translatable", "--compact"]).unwrap();
        let Commands::Translatable(args) = cli.command else {
            panic!("expected translatable");
        };
        assert!(args.compact);
    }

    #[test]
    fn cli_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["docfm", "sign"]).is_err());
    }
}
