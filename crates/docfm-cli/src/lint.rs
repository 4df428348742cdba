//! # Lint Subcommand
//!
//! Validates the frontmatter of markdown files against the documentation
//! schema and prints one line per file plus a summary.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use docfm_schema::{Frontmatter, ParseOverrides};

use crate::config::{DocfmConfig, RegistryArgs};

/// Arguments for the `docfm lint` subcommand.
#[derive(Args, Debug)]
pub struct LintArgs {
    /// Markdown files or directories to lint. Directories are searched
    /// recursively for `.md` files.
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Accept frontmatter keys the schema does not declare.
    #[arg(long)]
    pub no_validate_key_names: bool,

    /// Request key-order validation (accepted, not enforced).
    #[arg(long)]
    pub validate_key_order: bool,

    #[command(flatten)]
    pub registries: RegistryArgs,
}

/// Outcome of linting a set of files.
#[derive(Debug, Default)]
pub struct LintReport {
    /// Files examined.
    pub total: usize,
    /// Files whose frontmatter is valid.
    pub passed: Vec<PathBuf>,
    /// `(path, error)` for every failing file.
    pub failures: Vec<(PathBuf, String)>,
}

/// Execute the lint subcommand.
///
/// Returns exit code: 0 when every file passes, 1 otherwise.
pub fn run_lint(args: &LintArgs, config: DocfmConfig) -> Result<u8> {
    let mut config = args.registries.apply(config);
    if args.no_validate_key_names {
        config.validate_key_names = false;
    }
    if args.validate_key_order {
        config.validate_key_order = true;
    }

    let (versions, layouts) = config.registries()?;
    let parser = Frontmatter::from_registries(&versions, &layouts)
        .context("failed to compile frontmatter schema")?;

    let files = collect_markdown_files(&args.paths)?;
    let report = lint_files(&parser, &config, &files);

    for path in &report.passed {
        println!("OK: {}", path.display());
    }
    for (path, error) in &report.failures {
        println!("FAIL: {}", path.display());
        println!("  {error}");
    }
    println!("Files: {}/{} passed", report.passed.len(), report.total);

    if report.failures.is_empty() {
        Ok(0)
    } else {
        println!(
            "\n{} file(s) failed frontmatter validation out of {} total.",
            report.failures.len(),
            report.total
        );
        Ok(1)
    }
}

/// Lint every file in `files`.
pub fn lint_files(parser: &Frontmatter, config: &DocfmConfig, files: &[PathBuf]) -> LintReport {
    let mut report = LintReport {
        total: files.len(),
        ..LintReport::default()
    };

    for path in files {
        match lint_file(parser, config, path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "frontmatter ok");
                report.passed.push(path.clone());
            }
            Err(e) => report.failures.push((path.clone(), format!("{e:#}"))),
        }
    }

    report
}

fn lint_file(parser: &Frontmatter, config: &DocfmConfig, path: &Path) -> Result<()> {
    let markdown = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let overrides = ParseOverrides::none()
        .validate_key_names(config.validate_key_names)
        .validate_key_order(config.validate_key_order)
        .filepath(path);
    parser.parse(&markdown, overrides)?;
    Ok(())
}

/// Expand `paths` into a sorted list of markdown files.
pub fn collect_markdown_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            walk_markdown(path, &mut files)
                .with_context(|| format!("cannot read directory {}", path.display()))?;
        } else if path.exists() {
            files.push(path.clone());
        } else {
            anyhow::bail!("path does not exist: {}", path.display());
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn walk_markdown(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk_markdown(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "md") {
            out.push(path);
        }
    }
    Ok(())
}
