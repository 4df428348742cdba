//! # Field Descriptors
//!
//! A [`FieldDescriptor`] declares what one frontmatter key may hold: its
//! type (or union of types), whether it is required, its default, an
//! enumeration of allowed literals, numeric bounds, nested properties for
//! objects, an item descriptor for arrays, a conformance predicate, a
//! replacement violation message, and the localization marker.
//!
//! Descriptors are assembled with a small builder API and rendered to JSON
//! Schema (Draft 2020-12) by [`FieldDescriptor::to_json_schema`] for the
//! `jsonschema` crate to enforce.

use serde_json::{Map, Value};

use docfm_core::{is_valid_range, is_well_formed_url};

/// Semantic type of a frontmatter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    String,
    Boolean,
    Number,
    Array,
    Object,
}

impl FieldType {
    /// JSON Schema `type` keyword value.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Boolean => "boolean",
            FieldType::Number => "number",
            FieldType::Array => "array",
            FieldType::Object => "object",
        }
    }
}

/// Custom conformance predicate applied to string values.
///
/// Each variant is registered with the validator as a named string
/// `format`, see [`Conformance::format_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conformance {
    /// Must be a syntactically valid SemVer range.
    SemverRange,
    /// Must be a well-formed absolute URL.
    Url,
}

impl Conformance {
    /// All predicates, in registration order.
    pub const ALL: [Conformance; 2] = [Conformance::SemverRange, Conformance::Url];

    /// Name of the JSON Schema `format` this predicate is registered under.
    pub fn format_name(&self) -> &'static str {
        match self {
            Conformance::SemverRange => "semver-range",
            Conformance::Url => "url",
        }
    }

    /// Evaluate the predicate.
    pub fn check(&self, value: &str) -> bool {
        match self {
            Conformance::SemverRange => is_valid_range(value),
            Conformance::Url => is_well_formed_url(value),
        }
    }
}

/// Ordered map of property name to descriptor.
///
/// Order is declaration order; it is what unknown-key messages list and
/// what a key-order check would compare against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    entries: Vec<(String, FieldDescriptor)>,
}

impl Properties {
    /// Create an empty property map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Properties::insert`].
    pub fn with(mut self, name: impl Into<String>, descriptor: FieldDescriptor) -> Self {
        self.insert(name, descriptor);
        self
    }

    /// Insert or replace a property. A replaced property keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, descriptor: FieldDescriptor) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = descriptor,
            None => self.entries.push((name, descriptor)),
        }
    }

    /// Look up a property by name.
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, d)| d)
    }

    /// Whether `name` is a declared property.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Property names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// `(name, descriptor)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.entries.iter().map(|(n, d)| (n.as_str(), d))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as the `properties` and `required` keywords of an object schema.
    pub(crate) fn write_json_schema(&self, out: &mut Map<String, Value>) {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for (name, descriptor) in &self.entries {
            properties.insert(name.clone(), descriptor.to_json_schema());
            if descriptor.required {
                required.push(Value::String(name.clone()));
            }
        }
        out.insert("properties".to_string(), Value::Object(properties));
        if !required.is_empty() {
            out.insert("required".to_string(), Value::Array(required));
        }
    }
}

/// Declaration of a single frontmatter field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    types: Vec<FieldType>,
    required: bool,
    default: Option<Value>,
    enum_values: Option<Vec<Value>>,
    minimum: Option<f64>,
    maximum: Option<f64>,
    properties: Option<Properties>,
    items: Option<Box<FieldDescriptor>>,
    conform: Option<Conformance>,
    message: Option<String>,
    translatable: bool,
    wildcard: Option<String>,
}

impl FieldDescriptor {
    /// A descriptor accepting any of `types`.
    pub fn of_types(types: &[FieldType]) -> Self {
        Self {
            types: types.to_vec(),
            required: false,
            default: None,
            enum_values: None,
            minimum: None,
            maximum: None,
            properties: None,
            items: None,
            conform: None,
            message: None,
            translatable: false,
            wildcard: None,
        }
    }

    pub fn string() -> Self {
        Self::of_types(&[FieldType::String])
    }

    pub fn boolean() -> Self {
        Self::of_types(&[FieldType::Boolean])
    }

    pub fn number() -> Self {
        Self::of_types(&[FieldType::Number])
    }

    pub fn array() -> Self {
        Self::of_types(&[FieldType::Array])
    }

    /// An array whose items must all be strings.
    pub fn string_array() -> Self {
        Self::array().with_items(Self::string())
    }

    pub fn object(properties: Properties) -> Self {
        Self::of_types(&[FieldType::Object]).with_properties(properties)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn translatable(mut self) -> Self {
        self.translatable = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_enum<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Inclusive numeric bounds.
    pub fn bounded(mut self, minimum: f64, maximum: f64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn with_items(mut self, items: FieldDescriptor) -> Self {
        self.items = Some(Box::new(items));
        self
    }

    pub fn conforming(mut self, conformance: Conformance) -> Self {
        self.conform = Some(conformance);
        self
    }

    /// Message reported instead of the validator's own wording when this
    /// field fails a check.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Accept the literal string `wildcard` in place of the field's other
    /// shapes. Any other string value is rejected.
    pub fn or_wildcard(mut self, wildcard: impl Into<String>) -> Self {
        if !self.types.contains(&FieldType::String) {
            self.types.push(FieldType::String);
        }
        self.wildcard = Some(wildcard.into());
        self
    }

    pub fn types(&self) -> &[FieldType] {
        &self.types
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn enum_values(&self) -> Option<&[Value]> {
        self.enum_values.as_deref()
    }

    pub fn minimum(&self) -> Option<f64> {
        self.minimum
    }

    pub fn maximum(&self) -> Option<f64> {
        self.maximum
    }

    pub fn properties(&self) -> Option<&Properties> {
        self.properties.as_ref()
    }

    pub fn items(&self) -> Option<&FieldDescriptor> {
        self.items.as_deref()
    }

    pub fn conform(&self) -> Option<Conformance> {
        self.conform
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_translatable(&self) -> bool {
        self.translatable
    }

    pub fn wildcard(&self) -> Option<&str> {
        self.wildcard.as_deref()
    }

    /// Render this descriptor as a JSON Schema subschema.
    ///
    /// `required` is not emitted here; JSON Schema declares it on the parent
    /// object, see [`Properties`]. The localization marker and the
    /// replacement message are carried as `x-translatable` and `x-message`
    /// annotations, which validators ignore.
    pub fn to_json_schema(&self) -> Value {
        let mut out = Map::new();

        let type_value = match self.types.as_slice() {
            [single] => Value::String(single.as_str().to_string()),
            many => Value::Array(
                many.iter()
                    .map(|t| Value::String(t.as_str().to_string()))
                    .collect(),
            ),
        };
        out.insert("type".to_string(), type_value);

        if let Some(values) = &self.enum_values {
            out.insert("enum".to_string(), Value::Array(values.clone()));
        }
        if let Some(min) = self.minimum {
            out.insert("minimum".to_string(), number_value(min));
        }
        if let Some(max) = self.maximum {
            out.insert("maximum".to_string(), number_value(max));
        }
        if let Some(default) = &self.default {
            out.insert("default".to_string(), default.clone());
        }
        if let Some(properties) = &self.properties {
            properties.write_json_schema(&mut out);
        }
        if let Some(items) = &self.items {
            out.insert("items".to_string(), items.to_json_schema());
        }
        if let Some(conform) = self.conform {
            out.insert(
                "format".to_string(),
                Value::String(conform.format_name().to_string()),
            );
        }
        if let Some(wildcard) = &self.wildcard {
            out.insert("if".to_string(), serde_json::json!({ "type": "string" }));
            out.insert("then".to_string(), serde_json::json!({ "const": wildcard }));
        }
        if let Some(message) = &self.message {
            out.insert("x-message".to_string(), Value::String(message.clone()));
        }
        if self.translatable {
            out.insert("x-translatable".to_string(), Value::Bool(true));
        }

        Value::Object(out)
    }
}

/// Whole numbers render as integers so exported schemas read `2`, not `2.0`.
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}
