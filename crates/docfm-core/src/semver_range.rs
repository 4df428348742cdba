//! # SemVer Range Validation
//!
//! Frontmatter `versions` entries are written in the range syntax used by
//! the npm ecosystem: whitespace-separated comparators (`>=1.0.0 <2.0.0`),
//! `||` alternatives, hyphen ranges (`1.2.3 - 2.3.4`), wildcards (`*`,
//! `2.x`), tilde and caret requirements.
//!
//! The `semver` crate parses Cargo's dialect, which separates comparators
//! with commas and knows neither `||` nor hyphen ranges. This module
//! rewrites each alternative into Cargo's dialect and lets
//! [`semver::VersionReq`] decide whether it is well-formed. Only syntax is
//! checked; matching versions against a range is out of scope.

use semver::VersionReq;

const OPERATOR_CHARS: &[char] = &['<', '>', '=', '~', '^'];

/// Returns `true` if `input` is a syntactically valid SemVer range.
///
/// An empty (or all-whitespace) range is valid and means "any version".
pub fn is_valid_range(input: &str) -> bool {
    parse_range(input).is_some()
}

/// Parse `input` into one [`VersionReq`] per `||` alternative.
///
/// Returns `None` if any alternative is not a valid range.
pub fn parse_range(input: &str) -> Option<Vec<VersionReq>> {
    input
        .split("||")
        .map(|alternative| parse_alternative(alternative.trim()))
        .collect()
}

fn parse_alternative(alternative: &str) -> Option<VersionReq> {
    if alternative.is_empty() {
        return Some(VersionReq::STAR);
    }

    let comparators = match alternative.split_once(" - ") {
        Some((low, high)) => vec![
            format!(">={}", strip_v(low.trim())?),
            format!("<={}", strip_v(high.trim())?),
        ],
        None => comparators(alternative)?,
    };

    VersionReq::parse(&comparators.join(", ")).ok()
}

/// Split a whitespace-separated comparator set, re-attaching operators that
/// were written with a space before their version (`>= 1.0.0`).
fn comparators(alternative: &str) -> Option<Vec<String>> {
    let mut out = Vec::new();
    let mut pending_op: Option<&str> = None;

    for token in alternative.split_whitespace() {
        let op_len = token
            .find(|c: char| !OPERATOR_CHARS.contains(&c))
            .unwrap_or(token.len());
        let (op, version) = token.split_at(op_len);

        if version.is_empty() {
            // A bare operator; it binds to the next token.
            if pending_op.is_some() || op.is_empty() {
                return None;
            }
            pending_op = Some(op);
            continue;
        }

        let op = match pending_op.take() {
            Some(prev) if op.is_empty() => prev,
            Some(_) => return None,
            None => op,
        };
        out.push(format!("{}{}", normalize_op(op), strip_v(version)?));
    }

    if pending_op.is_some() {
        return None;
    }
    Some(out)
}

fn normalize_op(op: &str) -> &str {
    match op {
        "~>" => "~",
        other => other,
    }
}

fn strip_v(version: &str) -> Option<&str> {
    let version = version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('V'))
        .unwrap_or(version);
    if version.is_empty() {
        None
    } else {
        Some(version)
    }
}
