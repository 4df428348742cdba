//! # Frontmatter Schema
//!
//! The catalogue of keys a documentation page may declare in its
//! frontmatter. Most entries are static; two are derived from registries
//! at construction time:
//!
//! - `layout` enumerates every known layout name plus `false` ("no layout");
//! - `versions` has one SemVer-range property per known version identifier,
//!   or may be the wildcard `"*"` meaning "all versions".
//!
//! A [`FrontmatterSchema`] is built once from its registries and never
//! mutated afterwards. Share it behind an `Arc`; later registry changes do
//! not reach an already-built schema.

use serde_json::{Map, Value};

use docfm_core::{LayoutRegistry, VersionRegistry};

use crate::field::{Conformance, FieldDescriptor, FieldType, Properties};

/// JSON Schema dialect of [`FrontmatterSchema::to_json_schema`].
pub const JSON_SCHEMA_DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

/// Violation message for a `layout` that names no existing layout.
pub const LAYOUT_MESSAGE: &str =
    "must be the filename of an existing layout file, or `false` for no layout";

/// Violation message for a `versions` entry that is not a SemVer range.
pub const SEMVER_RANGE_MESSAGE: &str = "Must be a valid SemVer range";

/// `versions` value meaning "applies to all versions".
pub const ALL_VERSIONS: &str = "*";

/// Allowed values of `type`.
pub const GUIDE_TYPES: [&str; 5] = ["overview", "quick_start", "tutorial", "how_to", "reference"];

/// Allowed values of `defaultPlatform`.
pub const PLATFORMS: [&str; 3] = ["mac", "windows", "linux"];

/// Allowed values of `defaultTool`.
pub const TOOLS: [&str; 4] = ["webui", "cli", "desktop", "curl"];

/// Products listed under `externalProducts`.
pub const EXTERNAL_PRODUCTS: [&str; 3] = ["cli", "atom", "electron"];

/// The frontmatter schema for documentation pages.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontmatterSchema {
    properties: Properties,
}

impl FrontmatterSchema {
    /// Build the documentation frontmatter schema from the given registries.
    ///
    /// Cannot fail. An empty version registry yields a `versions` object
    /// with no declared properties; that is logged but accepted.
    pub fn new(versions: &VersionRegistry, layouts: &LayoutRegistry) -> Self {
        if versions.is_empty() {
            tracing::warn!("version registry is empty; `versions` will accept any object");
        }
        if layouts.is_empty() {
            tracing::warn!("layout registry is empty; only `layout: false` will validate");
        }

        let properties = Properties::new()
            .with("title", FieldDescriptor::string().required().translatable())
            .with("shortTitle", FieldDescriptor::string().translatable())
            .with("intro", FieldDescriptor::string().translatable())
            .with("product", FieldDescriptor::string().translatable())
            .with("permissions", FieldDescriptor::string())
            // true by default on articles, false on all other content
            .with("showMiniToc", FieldDescriptor::boolean())
            .with(
                "miniTocMaxHeadingLevel",
                FieldDescriptor::number().with_default(2).bounded(2.0, 4.0),
            )
            .with("mapTopic", FieldDescriptor::boolean())
            // hidden articles are allowed under early-access
            .with("hidden", FieldDescriptor::boolean())
            .with("layout", layout_field(layouts))
            .with(
                "redirect_from",
                FieldDescriptor::of_types(&[FieldType::Array, FieldType::String])
                    .with_items(FieldDescriptor::string()),
            )
            .with("allowTitleToDifferFromFilename", FieldDescriptor::boolean())
            .with(
                "introLinks",
                FieldDescriptor::object(
                    Properties::new()
                        .with("quickstart", FieldDescriptor::string())
                        .with("reference", FieldDescriptor::string())
                        .with("overview", FieldDescriptor::string()),
                ),
            )
            .with("authors", FieldDescriptor::string_array())
            .with("examples_source", FieldDescriptor::string())
            .with(
                "featuredLinks",
                FieldDescriptor::object(
                    Properties::new()
                        .with("gettingStarted", FieldDescriptor::string_array())
                        .with("guides", FieldDescriptor::string_array())
                        .with("guideCards", FieldDescriptor::string_array())
                        .with("popular", FieldDescriptor::string_array())
                        // alternate heading for the popular column
                        .with("popularHeading", FieldDescriptor::string()),
                ),
            )
            // "What's new" section of product landing pages
            .with(
                "changelog",
                FieldDescriptor::object(
                    Properties::new()
                        .with("label", FieldDescriptor::string())
                        .with("prefix", FieldDescriptor::string()),
                ),
            )
            .with("type", FieldDescriptor::string().with_enum(GUIDE_TYPES))
            .with("topics", FieldDescriptor::array())
            .with("includeGuides", FieldDescriptor::array())
            .with("learningTracks", FieldDescriptor::array())
            .with("beta_product", FieldDescriptor::boolean())
            .with("product_video", FieldDescriptor::string())
            .with("interactive", FieldDescriptor::boolean())
            .with("defaultPlatform", FieldDescriptor::string().with_enum(PLATFORMS))
            .with("defaultTool", FieldDescriptor::string().with_enum(TOOLS))
            // third-party contributed documentation
            .with(
                "contributor",
                FieldDescriptor::object(
                    Properties::new()
                        .with("name", FieldDescriptor::string())
                        .with("URL", FieldDescriptor::string()),
                ),
            )
            .with("children", FieldDescriptor::array())
            .with("externalProducts", external_products_field())
            .with("versions", versions_field(versions));

        tracing::debug!(
            fields = properties.len(),
            versions = versions.len(),
            layouts = layouts.len(),
            "built frontmatter schema"
        );

        Self { properties }
    }

    /// Wrap an arbitrary property catalogue, for callers validating other
    /// kinds of documents with the same machinery.
    pub fn from_properties(properties: Properties) -> Self {
        Self { properties }
    }

    /// Top-level properties in declaration order.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Descriptor of a top-level field.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.properties.get(name)
    }

    /// Top-level key names in declaration order.
    pub fn allowed_keys(&self) -> impl Iterator<Item = &str> {
        self.properties.names()
    }

    /// Names of the top-level fields marked for translation.
    pub fn translatable_fields(&self) -> Vec<&str> {
        self.properties
            .iter()
            .filter(|(_, d)| d.is_translatable())
            .map(|(name, _)| name)
            .collect()
    }

    /// Declared default of a top-level field.
    pub fn default_value(&self, name: &str) -> Option<&Value> {
        self.field(name).and_then(FieldDescriptor::default_value)
    }

    /// Find the descriptor governing the value at `path`, where `path` is
    /// the sequence of object keys and array indices from the document root.
    pub fn descriptor_at<'a, I>(&self, path: I) -> Option<&FieldDescriptor>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut segments = path.into_iter();
        let mut current = self.properties.get(segments.next()?)?;
        for segment in segments {
            current = match (current.properties(), current.items()) {
                (Some(props), _) if props.contains(segment) => props.get(segment)?,
                (_, Some(items)) if segment.parse::<usize>().is_ok() => items,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Render the whole schema as a Draft 2020-12 JSON Schema document.
    ///
    /// Unknown top-level keys are not forbidden here; that check is a
    /// parse option rather than part of the schema.
    pub fn to_json_schema(&self) -> Value {
        let mut out = Map::new();
        out.insert(
            "$schema".to_string(),
            Value::String(JSON_SCHEMA_DIALECT.to_string()),
        );
        out.insert("type".to_string(), Value::String("object".to_string()));
        self.properties.write_json_schema(&mut out);
        Value::Object(out)
    }
}

fn layout_field(layouts: &LayoutRegistry) -> FieldDescriptor {
    let allowed: Vec<Value> = layouts
        .iter()
        .map(Value::from)
        .chain(std::iter::once(Value::Bool(false)))
        .collect();
    FieldDescriptor::of_types(&[FieldType::String, FieldType::Boolean])
        .with_enum(allowed)
        .with_message(LAYOUT_MESSAGE)
}

fn external_products_field() -> FieldDescriptor {
    let mut products = Properties::new();
    for product in EXTERNAL_PRODUCTS {
        products.insert(
            product,
            FieldDescriptor::object(
                Properties::new()
                    .with("id", FieldDescriptor::string().required())
                    .with("name", FieldDescriptor::string().required())
                    .with(
                        "href",
                        FieldDescriptor::string()
                            .conforming(Conformance::Url)
                            .required(),
                    )
                    .with("external", FieldDescriptor::boolean().required()),
            )
            .required(),
        );
    }
    FieldDescriptor::object(products)
}

fn versions_field(versions: &VersionRegistry) -> FieldDescriptor {
    let mut per_version = Properties::new();
    for id in versions.iter() {
        per_version.insert(
            id,
            FieldDescriptor::string()
                .conforming(Conformance::SemverRange)
                .with_message(SEMVER_RANGE_MESSAGE),
        );
    }
    FieldDescriptor::object(per_version)
        .or_wildcard(ALL_VERSIONS)
        .required()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_schema() -> FrontmatterSchema {
        let versions: VersionRegistry = ["free-pro-team@latest", "enterprise-server@3.0"]
            .into_iter()
            .collect();
        let layouts: LayoutRegistry = ["default", "product-landing"].into_iter().collect();
        FrontmatterSchema::new(&versions, &layouts)
    }

    #[test]
    fn catalogue_declares_every_field() {
        let schema = sample_schema();
        let expected = [
            "title",
            "shortTitle",
            "intro",
            "product",
            "permissions",
            "showMiniToc",
            "miniTocMaxHeadingLevel",
            "mapTopic",
            "hidden",
            "layout",
            "redirect_from",
            "allowTitleToDifferFromFilename",
            "introLinks",
            "authors",
            "examples_source",
            "featuredLinks",
            "changelog",
            "type",
            "topics",
            "includeGuides",
            "learningTracks",
            "beta_product",
            "product_video",
            "interactive",
            "defaultPlatform",
            "defaultTool",
            "contributor",
            "children",
            "externalProducts",
            "versions",
        ];
        assert_eq!(schema.allowed_keys().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn only_title_and_versions_are_required_at_top_level() {
        let schema = sample_schema();
        let required: Vec<&str> = schema
            .properties()
            .iter()
            .filter(|(_, d)| d.is_required())
            .map(|(n, _)| n)
            .collect();
        assert_eq!(required, vec!["title", "versions"]);
    }

    #[test]
    fn translatable_fields() {
        assert_eq!(
            sample_schema().translatable_fields(),
            vec!["title", "shortTitle", "intro", "product"]
        );
    }

    #[test]
    fn layout_enum_is_registry_plus_false() {
        let schema = sample_schema();
        let layout = schema.field("layout").unwrap();
        assert_eq!(
            layout.enum_values().unwrap(),
            &[json!("default"), json!("product-landing"), json!(false)]
        );
        assert_eq!(layout.message(), Some(LAYOUT_MESSAGE));
    }

    #[test]
    fn versions_has_one_range_per_identifier() {
        let schema = sample_schema();
        let versions = schema.field("versions").unwrap();
        let props = versions.properties().unwrap();
        assert_eq!(
            props.names().collect::<Vec<_>>(),
            vec!["free-pro-team@latest", "enterprise-server@3.0"]
        );
        for (_, d) in props.iter() {
            assert_eq!(d.conform(), Some(Conformance::SemverRange));
            assert_eq!(d.message(), Some(SEMVER_RANGE_MESSAGE));
        }
        assert_eq!(versions.wildcard(), Some(ALL_VERSIONS));
    }

    #[test]
    fn empty_registries_yield_degenerate_schema() {
        let schema = FrontmatterSchema::new(&VersionRegistry::new(), &LayoutRegistry::new());
        let versions = schema.field("versions").unwrap();
        assert!(versions.properties().unwrap().is_empty());
        assert_eq!(
            schema.field("layout").unwrap().enum_values().unwrap(),
            &[json!(false)]
        );
    }

    #[test]
    fn registries_are_captured_at_construction() {
        let versions: VersionRegistry = ["free-pro-team@latest"].into_iter().collect();
        let mut layouts: LayoutRegistry = ["default"].into_iter().collect();
        let schema = FrontmatterSchema::new(&versions, &layouts);
        layouts.insert("late-addition");
        let allowed = schema.field("layout").unwrap().enum_values().unwrap();
        assert!(!allowed.contains(&json!("late-addition")));
    }

    #[test]
    fn mini_toc_default() {
        assert_eq!(
            sample_schema().default_value("miniTocMaxHeadingLevel"),
            Some(&json!(2))
        );
    }

    #[test]
    fn descriptor_lookup_walks_objects_and_arrays() {
        let schema = sample_schema();
        let href = schema
            .descriptor_at(["externalProducts", "cli", "href"])
            .unwrap();
        assert_eq!(href.conform(), Some(Conformance::Url));

        let item = schema.descriptor_at(["authors", "0"]).unwrap();
        assert_eq!(item.types(), &[FieldType::String]);

        assert!(schema.descriptor_at(["introLinks", "bogus"]).is_none());
        assert!(schema.descriptor_at(["nope"]).is_none());
    }

    #[test]
    fn json_schema_export() {
        let json = sample_schema().to_json_schema();
        assert_eq!(json["$schema"], JSON_SCHEMA_DIALECT);
        assert_eq!(json["required"], json!(["title", "versions"]));
        assert_eq!(
            json["properties"]["externalProducts"]["required"],
            json!(["cli", "atom", "electron"])
        );
        assert_eq!(
            json["properties"]["externalProducts"]["properties"]["atom"]["required"],
            json!(["id", "name", "href", "external"])
        );
        assert_eq!(
            json["properties"]["versions"]["type"],
            json!(["object", "string"])
        );
        assert_eq!(
            json["properties"]["type"]["enum"],
            json!(["overview", "quick_start", "tutorial", "how_to", "reference"])
        );
    }
}
