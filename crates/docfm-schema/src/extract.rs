//! # Frontmatter Extraction
//!
//! Splits a markdown document into its leading `---`-delimited YAML block
//! and the body that follows, and converts the block into a JSON value
//! tree for schema validation.

use serde_json::{Map, Value};

const DELIMITER: &str = "---";

/// A markdown document split at its frontmatter block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a> {
    /// The YAML between the delimiters, `None` when the document has no
    /// frontmatter block.
    pub yaml: Option<&'a str>,
    /// The document body with the block stripped.
    pub content: &'a str,
}

/// The opening delimiter was found but no closing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unclosed;

/// Split `markdown` at its frontmatter block.
///
/// The block must start on the first line (after an optional byte-order
/// mark) with a line consisting of `---`, and ends at the next such line.
/// Trailing whitespace and `\r` on delimiter lines are ignored.
pub fn split(markdown: &str) -> Result<Split<'_>, Unclosed> {
    let text = markdown.strip_prefix('\u{feff}').unwrap_or(markdown);

    let (first_line, mut rest) = next_line(text);
    if first_line.trim_end() != DELIMITER {
        return Ok(Split {
            yaml: None,
            content: text,
        });
    }

    let yaml_start = rest;
    let mut yaml_len = 0;
    while !rest.is_empty() {
        let (line, after) = next_line(rest);
        if line.trim_end() == DELIMITER {
            return Ok(Split {
                yaml: Some(&yaml_start[..yaml_len]),
                content: after,
            });
        }
        yaml_len += rest.len() - after.len();
        rest = after;
    }

    Err(Unclosed)
}

/// Returns the first line of `text` (without its `\n`) and everything after.
fn next_line(text: &str) -> (&str, &str) {
    match text.find('\n') {
        Some(pos) => (&text[..pos], &text[pos + 1..]),
        None => (text, ""),
    }
}

/// Parse a YAML block into a JSON object.
///
/// An empty block yields an empty object. Anything other than a mapping at
/// the top level is rejected, as is anything [`yaml_to_json_value`] rejects.
pub fn parse_block(yaml: &str) -> Result<Map<String, Value>, String> {
    let value: serde_yaml::Value = serde_yaml::from_str(yaml).map_err(|e| e.to_string())?;
    match yaml_to_json_value(&value)? {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => Ok(map),
        other => Err(format!(
            "frontmatter must be a mapping of keys to values, found {}",
            json_kind(&other)
        )),
    }
}

/// Convert a parsed frontmatter block into the JSON tree the validator sees.
///
/// Frontmatter is plain data. Explicit YAML tags (`!include`, `!!binary`)
/// are rejected rather than silently dropped, mapping keys must be strings
/// so they line up with schema property names, and floats must be finite.
/// Diagnostics name the offending key path.
pub fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    convert(yaml, &mut Vec::new())
}

fn convert(yaml: &serde_yaml::Value, path: &mut Vec<String>) -> Result<Value, String> {
    use serde_yaml::Value as Yaml;

    Ok(match yaml {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(*b),
        Yaml::String(s) => Value::String(s.clone()),
        Yaml::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => Value::from(i),
            (None, Some(u), _) => Value::from(u),
            (None, None, Some(f)) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .ok_or_else(|| format!("{}: non-finite number {f}", at(path)))?,
            _ => return Err(format!("{}: unsupported number {n}", at(path))),
        },
        Yaml::Sequence(seq) => {
            let mut items = Vec::with_capacity(seq.len());
            for (i, item) in seq.iter().enumerate() {
                path.push(i.to_string());
                items.push(convert(item, path)?);
                path.pop();
            }
            Value::Array(items)
        }
        Yaml::Mapping(mapping) => {
            let mut object = Map::new();
            for (key, value) in mapping {
                let Yaml::String(key) = key else {
                    return Err(format!(
                        "{}: keys must be strings, found `{}`",
                        at(path),
                        scalar_text(key)
                    ));
                };
                path.push(key.clone());
                object.insert(key.clone(), convert(value, path)?);
                path.pop();
            }
            Value::Object(object)
        }
        Yaml::Tagged(tagged) => {
            return Err(format!(
                "{}: YAML tag `{}` is not allowed in frontmatter",
                at(path),
                tagged.tag
            ))
        }
    })
}

fn at(path: &[String]) -> String {
    if path.is_empty() {
        "(root)".to_string()
    } else {
        path.join(".")
    }
}

fn scalar_text(value: &serde_yaml::Value) -> String {
    serde_yaml::to_string(value)
        .map(|s| s.trim_end().to_string())
        .unwrap_or_else(|_| "?".to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
