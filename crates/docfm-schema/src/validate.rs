//! # Schema Validation
//!
//! Compiles a [`FrontmatterSchema`] into a `jsonschema` validator (Draft
//! 2020-12) and turns validator output into structured [`Violation`]s.
//!
//! The conformance predicates of [`Conformance`] are registered as custom
//! string formats, and format assertion is switched on; 2020-12 treats
//! `format` as an annotation unless told otherwise.
//!
//! When the descriptor governing a failing value declares its own message,
//! that message replaces the validator's wording. Missing-field errors keep
//! the validator's wording, since they are reported against the parent.

use std::fmt;
use std::sync::Arc;

use jsonschema::error::ValidationErrorKind;
use jsonschema::{ValidationOptions, Validator};
use serde_json::{Map, Value};

use crate::error::{FrontmatterError, Violation, ViolationKind};
use crate::field::{Conformance, FieldDescriptor};
use crate::schema::FrontmatterSchema;

/// A schema together with its compiled validator.
///
/// `Send + Sync`; compile once and share.
pub struct CompiledSchema {
    schema: Arc<FrontmatterSchema>,
    validator: Validator,
}

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("fields", &self.schema.properties().len())
            .finish_non_exhaustive()
    }
}

impl CompiledSchema {
    /// Compile `schema`.
    ///
    /// # Errors
    ///
    /// Returns `FrontmatterError::ValidatorBuild` if the rendered JSON
    /// Schema is rejected by the validator.
    pub fn compile(schema: Arc<FrontmatterSchema>) -> Result<Self, FrontmatterError> {
        let json_schema = schema.to_json_schema();
        let validator = build_options().build(&json_schema).map_err(|e| {
            FrontmatterError::ValidatorBuild {
                reason: e.to_string(),
            }
        })?;

        tracing::debug!(
            fields = schema.properties().len(),
            "compiled frontmatter validator"
        );

        Ok(Self { schema, validator })
    }

    /// The schema this validator was compiled from.
    pub fn schema(&self) -> &Arc<FrontmatterSchema> {
        &self.schema
    }

    /// Returns true if `instance` conforms to the schema.
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }

    /// Every schema violation in `instance`.
    pub fn violations(&self, instance: &Value) -> Vec<Violation> {
        self.validator
            .iter_errors(instance)
            .map(|error| {
                let instance_path = error.instance_path.to_string();
                let schema_path = error.schema_path.to_string();
                let kind = ViolationKind::from_keyword(
                    schema_path.rsplit('/').next().unwrap_or_default(),
                );
                let mut segments = pointer_segments(&instance_path);
                let mut message = error.to_string();

                if let ValidationErrorKind::Required { property } = &error.kind {
                    if let Some(name) = property.as_str() {
                        segments.push(name.to_string());
                    }
                } else if let Some(custom) = self
                    .schema
                    .descriptor_at(segments.iter().map(String::as_str))
                    .and_then(FieldDescriptor::message)
                {
                    message = custom.to_string();
                }

                Violation {
                    property: segments.join("."),
                    instance_path,
                    schema_path,
                    kind,
                    message,
                }
            })
            .collect()
    }
}

/// Report every top-level key of `data` that `schema` does not declare.
pub fn unknown_key_violations(
    schema: &FrontmatterSchema,
    data: &Map<String, Value>,
) -> Vec<Violation> {
    let allowed = schema.allowed_keys().collect::<Vec<_>>().join(", ");
    data.keys()
        .filter(|key| !schema.properties().contains(key))
        .map(|key| Violation {
            property: key.clone(),
            instance_path: format!("/{}", escape_pointer_segment(key)),
            schema_path: String::new(),
            kind: ViolationKind::UnknownKey,
            message: format!("not allowed. Allowed properties are: {allowed}"),
        })
        .collect()
}

fn build_options() -> ValidationOptions {
    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft202012);
    opts.should_validate_formats(true);
    for conformance in Conformance::ALL {
        opts.with_format(conformance.format_name(), move |value: &str| {
            conformance.check(value)
        });
    }
    opts
}

/// Split a JSON Pointer into unescaped segments.
fn pointer_segments(pointer: &str) -> Vec<String> {
    if pointer.is_empty() {
        return Vec::new();
    }
    pointer
        .split('/')
        .skip(1)
        .map(|s| s.replace("~1", "/").replace("~0", "~"))
        .collect()
}

fn escape_pointer_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Properties;
    use serde_json::json;

    fn compiled(properties: Properties) -> CompiledSchema {
        CompiledSchema::compile(Arc::new(FrontmatterSchema::from_properties(properties))).unwrap()
    }

    #[test]
    fn pointer_round_trip() {
        assert!(pointer_segments("").is_empty());
        assert_eq!(
            pointer_segments("/versions/enterprise-server@3.0"),
            vec!["versions", "enterprise-server@3.0"]
        );
        assert_eq!(pointer_segments("/a~1b/c~0d"), vec!["a/b", "c~d"]);
        assert_eq!(escape_pointer_segment("a/b~c"), "a~1b~0c");
    }

    #[test]
    fn required_violation_names_missing_property() {
        let schema = compiled(Properties::new().with("name", FieldDescriptor::string().required()));
        let violations = schema.violations(&json!({}));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].property, "name");
        assert_eq!(violations[0].kind, ViolationKind::Required);
        assert!(violations[0].message.contains("name"));
    }

    #[test]
    fn custom_message_replaces_validator_wording() {
        let schema = compiled(Properties::new().with(
            "color",
            FieldDescriptor::string()
                .with_enum(["red", "blue"])
                .with_message("pick a primary color"),
        ));
        let violations = schema.violations(&json!({ "color": "green" }));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::Enum);
        assert_eq!(violations[0].message, "pick a primary color");
        assert_eq!(violations[0].instance_path, "/color");
    }

    #[test]
    fn formats_are_asserted() {
        let schema = compiled(
            Properties::new()
                .with("href", FieldDescriptor::string().conforming(Conformance::Url))
                .with(
                    "range",
                    FieldDescriptor::string().conforming(Conformance::SemverRange),
                ),
        );
        assert!(schema.is_valid(&json!({ "href": "https://example.com", "range": ">=1.0.0" })));

        let violations = schema.violations(&json!({ "href": "nope", "range": "nope" }));
        assert_eq!(violations.len(), 2);
        assert!(violations.iter().all(|v| v.kind == ViolationKind::Conformance));
    }

    #[test]
    fn kind_follows_the_failing_keyword() {
        let schema = compiled(
            Properties::new().with("level", FieldDescriptor::number().bounded(2.0, 4.0)),
        );
        let violations = schema.violations(&json!({ "level": 5 }));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].property, "level");
        assert!(violations[0].schema_path.ends_with("/maximum"));
        assert_eq!(violations[0].kind, ViolationKind::Bounds);

        let violations = schema.violations(&json!({ "level": "high" }));
        assert_eq!(violations[0].kind, ViolationKind::Type);
        assert!(violations[0].schema_path.ends_with("/type"));
    }

    #[test]
    fn unknown_keys_are_listed_with_allowed_set() {
        let schema = FrontmatterSchema::from_properties(
            Properties::new()
                .with("title", FieldDescriptor::string())
                .with("intro", FieldDescriptor::string()),
        );
        let data = json!({ "title": "x", "bogus": 1 });
        let violations = unknown_key_violations(&schema, data.as_object().unwrap());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].property, "bogus");
        assert_eq!(
            violations[0].message,
            "not allowed. Allowed properties are: title, intro"
        );
    }
}
