//! # Schema Fragments
//!
//! A [`Schema`] is one structural description of an accepted value shape.
//! Fragments are built with typed constructors (`Schema::string()`,
//! `Schema::object()`, ...) and chained builder methods, then either
//! rendered to a JSON Schema document or used to load a raw value.
//!
//! ## Keyword Model
//!
//! The core interprets five keywords: `type`, `properties`, `items`,
//! `required` and `default`. Every other keyword (`format`, `maxLength`,
//! `enum`, ...) is carried verbatim in an ordered pass-through map and
//! reaches the rendered document unchanged.
//!
//! ## Class References
//!
//! Wherever a nested schema is expected, a [`SchemaNode`] may hold either a
//! fragment or a `&'static ClassDef`. Rendering substitutes every class
//! reference with that class's own rendered document, so the document handed
//! to the validator is always purely structural.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use classy_core::{ClassyError, JsonType};

use crate::class::ClassDef;

/// Keywords the loader interprets itself.
pub const RESERVED_KEYWORDS: [&str; 5] = ["type", "properties", "items", "required", "default"];

/// A nested schema position: an inline fragment or a typed class.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// An inline schema fragment.
    Fragment(Box<Schema>),
    /// A reference to a typed class; loads into an instance of that class.
    Class(&'static ClassDef),
}

impl SchemaNode {
    /// Render this node as a structural document.
    pub fn render(&self) -> Result<Value, ClassyError> {
        match self {
            Self::Fragment(schema) => schema.render(),
            Self::Class(class) => class.document().cloned(),
        }
    }

    /// The `default` declared for this node, if any.
    ///
    /// For class nodes this is the top-level default of the class schema.
    pub fn default_value(&self) -> Result<Option<&DefaultValue>, ClassyError> {
        match self {
            Self::Fragment(schema) => Ok(schema.default.as_ref()),
            Self::Class(class) => Ok(class.schema()?.default.as_ref()),
        }
    }

    /// The class referenced by this node, if it is a class node.
    pub fn as_class(&self) -> Option<&'static ClassDef> {
        match self {
            Self::Class(class) => Some(*class),
            Self::Fragment(_) => None,
        }
    }
}

impl From<Schema> for SchemaNode {
    fn from(schema: Schema) -> Self {
        Self::Fragment(Box::new(schema))
    }
}

impl From<&'static ClassDef> for SchemaNode {
    fn from(class: &'static ClassDef) -> Self {
        Self::Class(class)
    }
}

/// The `items` keyword of an array fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Items {
    /// One schema applied to every element.
    Single(SchemaNode),
    /// One schema per position.
    Positional(Vec<SchemaNode>),
}

/// The `default` keyword of a fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// A literal value used as-is.
    Literal(Value),
    /// A class instantiated from its empty input.
    Class(&'static ClassDef),
}

impl DefaultValue {
    fn render(&self) -> Value {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Class(class) => class.shape().empty_value(),
        }
    }
}

/// A schema fragment.
///
/// # Invariants
///
/// - `types` is never empty and never holds the same name twice.
/// - Pass-through keywords never shadow the reserved keywords.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub(crate) types: Vec<JsonType>,
    pub(crate) properties: Option<IndexMap<String, SchemaNode>>,
    pub(crate) required: Option<Vec<String>>,
    pub(crate) items: Option<Items>,
    pub(crate) default: Option<DefaultValue>,
    pub(crate) extra: Map<String, Value>,
}

impl Schema {
    /// A fragment accepting exactly one type.
    pub fn new(json_type: JsonType) -> Self {
        Self {
            types: vec![json_type],
            properties: None,
            required: None,
            items: None,
            default: None,
            extra: Map::new(),
        }
    }

    /// A fragment accepting any of `types`, de-duplicated in order.
    ///
    /// # Errors
    ///
    /// Returns `ClassyError::SchemaDefinition` if `types` is empty.
    pub fn with_types(types: impl IntoIterator<Item = JsonType>) -> Result<Self, ClassyError> {
        let mut iter = types.into_iter();
        let first = iter.next().ok_or_else(|| ClassyError::SchemaDefinition {
            subject: "schema fragment".to_string(),
            reason: "a fragment needs at least one type".to_string(),
        })?;
        let mut schema = Self::new(first);
        for t in iter {
            schema.add_type(t);
        }
        Ok(schema)
    }

    /// `{"type": "string"}`
    pub fn string() -> Self {
        Self::new(JsonType::String)
    }

    /// `{"type": "number"}`
    pub fn number() -> Self {
        Self::new(JsonType::Number)
    }

    /// `{"type": "integer"}`
    pub fn integer() -> Self {
        Self::new(JsonType::Integer)
    }

    /// `{"type": "boolean"}`
    pub fn boolean() -> Self {
        Self::new(JsonType::Boolean)
    }

    /// `{"type": "null"}`
    pub fn null() -> Self {
        Self::new(JsonType::Null)
    }

    /// `{"type": "object"}`
    pub fn object() -> Self {
        Self::new(JsonType::Object)
    }

    /// `{"type": "array"}`
    pub fn array() -> Self {
        Self::new(JsonType::Array)
    }

    // ─── Builders ───────────────────────────────────────────────────

    /// Declare a property. Properties keep their declaration order.
    pub fn property(mut self, name: impl Into<String>, node: impl Into<SchemaNode>) -> Self {
        self.properties
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), node.into());
        self
    }

    /// Set the `required` property names.
    pub fn required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Apply one schema to every array element.
    pub fn items(mut self, node: impl Into<SchemaNode>) -> Self {
        self.items = Some(Items::Single(node.into()));
        self
    }

    /// Apply one schema per array position.
    pub fn positional_items<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<SchemaNode>,
    {
        self.items = Some(Items::Positional(nodes.into_iter().map(Into::into).collect()));
        self
    }

    /// Use a literal value when the property is absent.
    pub fn default(mut self, value: Value) -> Self {
        self.default = Some(DefaultValue::Literal(value));
        self
    }

    /// Use a fresh instance of `class` when the property is absent.
    pub fn default_class(mut self, class: &'static ClassDef) -> Self {
        self.default = Some(DefaultValue::Class(class));
        self
    }

    /// Add a pass-through keyword.
    ///
    /// `default` is taken as a literal default. The other reserved keywords
    /// need their dedicated builders and are dropped here.
    pub fn keyword(mut self, name: impl Into<String>, value: Value) -> Self {
        let name = name.into();
        if name == "default" {
            return self.default(value);
        }
        if RESERVED_KEYWORDS.contains(&name.as_str()) {
            tracing::warn!(keyword = %name, "reserved keyword dropped from pass-through");
            return self;
        }
        self.extra.insert(name, value);
        self
    }

    /// Shorthand for the `format` keyword.
    pub fn format(self, format: &str) -> Self {
        self.keyword("format", Value::String(format.to_string()))
    }

    pub(crate) fn add_type(&mut self, json_type: JsonType) {
        if !self.types.contains(&json_type) {
            self.types.push(json_type);
        }
    }

    // ─── Accessors ──────────────────────────────────────────────────

    /// Accepted type names, in declaration order.
    pub fn types(&self) -> &[JsonType] {
        &self.types
    }

    /// Returns true if `json_type` is one of the accepted types.
    pub fn accepts(&self, json_type: JsonType) -> bool {
        self.types.contains(&json_type)
    }

    /// Returns true if the base shape of `value` is one of the accepted types.
    pub fn admits_value(&self, value: &Value) -> bool {
        self.types.iter().any(|t| t.admits_value(value))
    }

    /// Accepted types joined for messages, e.g. `integer | null`.
    pub fn type_label(&self) -> String {
        self.types
            .iter()
            .map(JsonType::as_str)
            .collect::<Vec<_>>()
            .join(" | ")
    }

    /// Declared properties, in declaration order.
    pub fn properties(&self) -> Option<&IndexMap<String, SchemaNode>> {
        self.properties.as_ref()
    }

    /// Names listed under `required`.
    pub fn required_names(&self) -> &[String] {
        self.required.as_deref().unwrap_or(&[])
    }

    /// The `items` keyword.
    pub fn item_spec(&self) -> Option<&Items> {
        self.items.as_ref()
    }

    /// The `default` keyword.
    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    /// Pass-through keywords, in insertion order.
    pub fn keywords(&self) -> &Map<String, Value> {
        &self.extra
    }

    // ─── Rendering ──────────────────────────────────────────────────

    /// Render the fully structural JSON Schema document.
    ///
    /// Keywords appear as `type`, `properties`, `required`, `items`,
    /// `default`, then the pass-through keywords in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `ClassyError::SchemaDefinition` if a referenced class has an
    /// unusable schema.
    pub fn render(&self) -> Result<Value, ClassyError> {
        let mut doc = Map::new();

        let types = match self.types.as_slice() {
            [single] => Value::String(single.as_str().to_string()),
            many => Value::Array(
                many.iter()
                    .map(|t| Value::String(t.as_str().to_string()))
                    .collect(),
            ),
        };
        doc.insert("type".to_string(), types);

        if let Some(properties) = &self.properties {
            let mut rendered = Map::new();
            for (name, node) in properties {
                rendered.insert(name.clone(), node.render()?);
            }
            doc.insert("properties".to_string(), Value::Object(rendered));
        }

        if let Some(required) = &self.required {
            doc.insert(
                "required".to_string(),
                Value::Array(required.iter().cloned().map(Value::String).collect()),
            );
        }

        match &self.items {
            Some(Items::Single(node)) => {
                doc.insert("items".to_string(), node.render()?);
            }
            Some(Items::Positional(nodes)) => {
                let rendered: Result<Vec<Value>, ClassyError> =
                    nodes.iter().map(SchemaNode::render).collect();
                doc.insert("items".to_string(), Value::Array(rendered?));
            }
            None => {}
        }

        if let Some(default) = &self.default {
            doc.insert("default".to_string(), default.render());
        }

        for (name, value) in &self.extra {
            doc.insert(name.clone(), value.clone());
        }

        Ok(Value::Object(doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::ClassDef;
    use serde_json::json;

    fn tag_schema() -> Result<Schema, ClassyError> {
        Ok(Schema::object()
            .property("name", Schema::string())
            .required(["name"]))
    }

    static TAG: ClassDef = ClassDef::object("Tag", tag_schema);

    fn tags_schema() -> Result<Schema, ClassyError> {
        Ok(Schema::array().items(&TAG))
    }

    static TAGS: ClassDef = ClassDef::array("Tags", tags_schema);

    #[test]
    fn test_basic_schema_creation() {
        let schema = Schema::object()
            .required(["k1", "k2"])
            .property("k1", Schema::string().format("date-time"))
            .property("k2", Schema::integer())
            .property("k3", Schema::number())
            .property("k4", Schema::array().items(Schema::integer()))
            .property("k5", Schema::null())
            .property("k6", Schema::boolean());

        let expected = json!({
            "type": "object",
            "required": ["k1", "k2"],
            "properties": {
                "k1": {"type": "string", "format": "date-time"},
                "k2": {"type": "integer"},
                "k3": {"type": "number"},
                "k4": {"type": "array", "items": {"type": "integer"}},
                "k5": {"type": "null"},
                "k6": {"type": "boolean"},
            },
        });
        assert_eq!(schema.render().unwrap(), expected);
    }

    #[test]
    fn test_render_keyword_order() {
        let schema = Schema::object()
            .keyword("additionalProperties", json!(false))
            .property("a", Schema::string())
            .required(["a"]);
        let doc = schema.render().unwrap();
        let keys: Vec<&String> = doc.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["type", "properties", "required", "additionalProperties"]);
    }

    #[test]
    fn test_render_substitutes_class_reference() {
        let schema = Schema::object().property("tag", &TAG);
        let doc = schema.render().unwrap();
        assert_eq!(
            doc["properties"]["tag"],
            json!({
                "type": "object",
                "properties": {"name": {"type": "string"}},
                "required": ["name"],
            })
        );
    }

    #[test]
    fn test_render_nested_class_in_class() {
        let schema = Schema::object().property("tags", &TAGS);
        let doc = schema.render().unwrap();
        assert_eq!(doc["properties"]["tags"]["type"], "array");
        assert_eq!(doc["properties"]["tags"]["items"]["required"], json!(["name"]));
    }

    #[test]
    fn test_render_positional_items_independently() {
        let schema = Schema::array().positional_items([
            SchemaNode::from(Schema::string()),
            SchemaNode::from(&TAG),
            SchemaNode::from(Schema::integer()),
        ]);
        let doc = schema.render().unwrap();
        let items = doc["items"].as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], json!({"type": "string"}));
        assert_eq!(items[1]["properties"]["name"], json!({"type": "string"}));
        assert_eq!(items[2], json!({"type": "integer"}));
    }

    #[test]
    fn test_render_without_items() {
        let doc = Schema::array().render().unwrap();
        assert_eq!(doc, json!({"type": "array"}));
    }

    #[test]
    fn test_render_class_default_as_empty_input() {
        let schema = Schema::object().default_class(&TAG);
        assert_eq!(schema.render().unwrap()["default"], json!({}));
        let schema = Schema::array().default_class(&TAGS);
        assert_eq!(schema.render().unwrap()["default"], json!([]));
    }

    #[test]
    fn test_render_literal_default() {
        let schema = Schema::string().default(json!("info"));
        assert_eq!(schema.render().unwrap(), json!({"type": "string", "default": "info"}));
    }

    #[test]
    fn test_reserved_keyword_cannot_shadow_type() {
        let schema = Schema::string().keyword("type", json!("integer"));
        assert_eq!(schema.render().unwrap()["type"], "string");
        assert!(schema.keywords().is_empty());
    }

    #[test]
    fn test_default_keyword_sets_literal_default() {
        let schema = Schema::string().keyword("default", json!("info"));
        assert!(matches!(
            schema.default_value(),
            Some(DefaultValue::Literal(v)) if v == &json!("info")
        ));
        assert!(!schema.keywords().contains_key("default"));
        assert_eq!(schema.render().unwrap(), json!({"type": "string", "default": "info"}));
    }

    #[test]
    fn test_reserved_keywords_never_reach_pass_through() {
        let schema = Schema::object()
            .keyword("properties", json!({"a": {"type": "string"}}))
            .keyword("required", json!(["a"]))
            .keyword("items", json!({"type": "string"}))
            .keyword("minProperties", json!(1));
        let names: Vec<&str> = schema.keywords().keys().map(String::as_str).collect();
        assert_eq!(names, ["minProperties"]);
        let merged = schema + Schema::object().keyword("type", json!("array"));
        assert_eq!(merged.keywords().len(), 1);
        assert_eq!(merged.types(), &[JsonType::Object]);
    }

    #[test]
    fn test_pass_through_keywords_survive() {
        let schema = Schema::string()
            .keyword("maxLength", json!(5))
            .keyword("enum", json!(["info", "debug"]));
        let doc = schema.render().unwrap();
        assert_eq!(doc["maxLength"], 5);
        assert_eq!(doc["enum"], json!(["info", "debug"]));
    }

    #[test]
    fn test_with_types_dedupes_in_order() {
        let schema = Schema::with_types([
            JsonType::String,
            JsonType::Boolean,
            JsonType::String,
        ])
        .unwrap();
        assert_eq!(schema.types(), &[JsonType::String, JsonType::Boolean]);
        assert_eq!(schema.render().unwrap()["type"], json!(["string", "boolean"]));
        assert_eq!(schema.type_label(), "string | boolean");
    }

    #[test]
    fn test_with_types_rejects_empty() {
        let err = Schema::with_types([]).unwrap_err();
        assert!(matches!(err, ClassyError::SchemaDefinition { .. }));
    }

    #[test]
    fn test_admits_value() {
        let schema = Schema::integer();
        assert!(schema.admits_value(&json!(3)));
        assert!(!schema.admits_value(&json!("3")));
        let schema = Schema::with_types([JsonType::Number, JsonType::Null]).unwrap();
        assert!(schema.admits_value(&json!(2.5)));
        assert!(schema.admits_value(&json!(null)));
    }

    #[test]
    fn test_property_declaration_order_kept() {
        let schema = Schema::object()
            .property("z", Schema::string())
            .property("a", Schema::string())
            .property("m", Schema::string());
        let names: Vec<&String> = schema.properties().unwrap().keys().collect();
        assert_eq!(names, ["z", "a", "m"]);
    }
}
