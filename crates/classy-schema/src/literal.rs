//! # Schema Literals
//!
//! Parses a JSON Schema mapping (from a file, the CLI, or `json!`) into a
//! [`Schema`]. The five reserved keywords are interpreted; every other
//! keyword is kept verbatim as pass-through. Class references cannot be
//! expressed in a literal: nested schemas always parse as fragments.

use std::str::FromStr;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use classy_core::{ClassyError, JsonType};

use crate::fragment::{Items, Schema, SchemaNode, RESERVED_KEYWORDS};

const SUBJECT: &str = "schema literal";

fn definition_error(reason: impl Into<String>) -> ClassyError {
    ClassyError::SchemaDefinition {
        subject: SUBJECT.to_string(),
        reason: reason.into(),
    }
}

impl Schema {
    /// Parse a schema literal.
    ///
    /// Without a `type` keyword, `object` is inferred from `properties` and
    /// `array` from `items`.
    ///
    /// # Errors
    ///
    /// Returns `ClassyError::SchemaDefinition` for non-mapping literals,
    /// unknown type names, malformed reserved keywords, or a missing `type`
    /// that cannot be inferred.
    pub fn from_value(literal: &Value) -> Result<Self, ClassyError> {
        let map = literal
            .as_object()
            .ok_or_else(|| definition_error(format!("expected a mapping, found {literal}")))?;

        let mut schema = Schema::with_types(parse_types(map)?)?;

        if let Some(props) = map.get("properties") {
            let props = props
                .as_object()
                .ok_or_else(|| definition_error("'properties' must be a mapping"))?;
            let mut parsed = IndexMap::with_capacity(props.len());
            for (name, sub) in props {
                parsed.insert(name.clone(), SchemaNode::from(Schema::from_value(sub)?));
            }
            schema.properties = Some(parsed);
        }

        if let Some(required) = map.get("required") {
            let names = required
                .as_array()
                .ok_or_else(|| definition_error("'required' must be an array"))?
                .iter()
                .map(|name| {
                    name.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| definition_error("'required' entries must be strings"))
                })
                .collect::<Result<Vec<_>, _>>()?;
            schema.required = Some(names);
        }

        match map.get("items") {
            Some(Value::Array(positions)) => {
                let nodes = positions
                    .iter()
                    .map(|sub| Schema::from_value(sub).map(SchemaNode::from))
                    .collect::<Result<Vec<_>, _>>()?;
                schema.items = Some(Items::Positional(nodes));
            }
            Some(sub @ Value::Object(_)) => {
                schema.items = Some(Items::Single(SchemaNode::from(Schema::from_value(sub)?)));
            }
            Some(_) => return Err(definition_error("'items' must be a mapping or an array")),
            None => {}
        }

        if let Some(default) = map.get("default") {
            schema = schema.default(default.clone());
        }

        for (name, value) in map {
            if !RESERVED_KEYWORDS.contains(&name.as_str()) {
                schema.extra.insert(name.clone(), value.clone());
            }
        }

        Ok(schema)
    }
}

fn parse_types(map: &Map<String, Value>) -> Result<Vec<JsonType>, ClassyError> {
    match map.get("type") {
        Some(Value::String(name)) => Ok(vec![JsonType::from_str(name)?]),
        Some(Value::Array(names)) => names
            .iter()
            .map(|name| match name {
                Value::String(name) => JsonType::from_str(name),
                other => Err(definition_error(format!(
                    "type names must be strings, found {other}"
                ))),
            })
            .collect(),
        Some(other) => Err(definition_error(format!(
            "'type' must be a string or an array, found {other}"
        ))),
        None if map.contains_key("properties") => Ok(vec![JsonType::Object]),
        None if map.contains_key("items") => Ok(vec![JsonType::Array]),
        None => Err(definition_error(
            "no 'type' given and none can be inferred from 'properties' or 'items'",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_literal_renders_back_unchanged() {
        let literal = json!({
            "type": "object",
            "properties": {
                "k1": {"type": "string", "format": "date-time"},
                "k2": {"type": ["integer", "null"], "minimum": 0},
                "k3": {"type": "array", "items": [{"type": "string"}, {"type": "boolean"}]},
            },
            "required": ["k1"],
            "additionalProperties": false,
        });
        let schema = Schema::from_value(&literal).unwrap();
        assert_eq!(schema.render().unwrap(), literal);
    }

    #[test]
    fn test_infers_object_from_properties() {
        let schema = Schema::from_value(&json!({"properties": {"a": {"type": "string"}}})).unwrap();
        assert_eq!(schema.types(), &[JsonType::Object]);
    }

    #[test]
    fn test_infers_array_from_items() {
        let schema = Schema::from_value(&json!({"items": {"type": "integer"}})).unwrap();
        assert_eq!(schema.types(), &[JsonType::Array]);
        assert!(matches!(schema.item_spec(), Some(Items::Single(_))));
    }

    #[test]
    fn test_missing_type_without_hint_fails() {
        let err = Schema::from_value(&json!({"maxLength": 3})).unwrap_err();
        assert!(matches!(err, ClassyError::SchemaDefinition { .. }));
    }

    #[test]
    fn test_unknown_type_name_fails() {
        let err = Schema::from_value(&json!({"type": ["string", "datetime"]})).unwrap_err();
        match err {
            ClassyError::SchemaDefinition { reason, .. } => assert!(reason.contains("datetime")),
            other => panic!("Expected SchemaDefinition, got: {other}"),
        }
    }

    #[test]
    fn test_non_mapping_literal_fails() {
        assert!(Schema::from_value(&json!("string")).is_err());
        assert!(Schema::from_value(&json!({"type": "object", "properties": []})).is_err());
        assert!(Schema::from_value(&json!({"type": "array", "items": 3})).is_err());
        assert!(Schema::from_value(&json!({"type": "object", "required": [1]})).is_err());
    }

    #[test]
    fn test_default_and_keywords_kept() {
        let schema = Schema::from_value(&json!({
            "type": "string",
            "default": "info",
            "enum": ["info", "debug"],
        }))
        .unwrap();
        assert!(schema.default_value().is_some());
        assert_eq!(schema.keywords()["enum"], json!(["info", "debug"]));
        let loaded = Schema::object()
            .property("level", schema)
            .load_object(json!({}), true)
            .unwrap();
        assert_eq!(loaded.attr("level").unwrap().as_str(), Some("info"));
    }
}
