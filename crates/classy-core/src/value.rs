//! # Structured Value Model
//!
//! Decoded data is represented as [`serde_json::Value`] built with the
//! `preserve_order` feature, so mappings keep their key order from input to
//! output. This module adds the two classifications the loader needs on top
//! of it:
//!
//! - [`ValueKind`]: the base shape of a decoded value, with integers and
//!   floats told apart. Used for shape checks and error reporting.
//! - [`JsonType`]: the JSON Schema `type` names a schema may declare, and
//!   which value kinds each one admits.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClassyError;

/// The base shape of a decoded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `null`.
    Null,
    /// `true` / `false`.
    Bool,
    /// A number representable as `i64` or `u64`.
    Integer,
    /// Any other number.
    Float,
    /// A string.
    String,
    /// An ordered sequence.
    Sequence,
    /// A key-ordered mapping.
    Mapping,
}

impl ValueKind {
    /// Classify a decoded value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::Integer,
            Value::Number(_) => Self::Float,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Sequence,
            Value::Object(_) => Self::Mapping,
        }
    }

    /// The JSON name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Integer => "integer",
            Self::Float => "number",
            Self::String => "string",
            Self::Sequence => "array",
            Self::Mapping => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A JSON Schema primitive type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    /// `"string"`
    String,
    /// `"number"`: any number, integers included.
    Number,
    /// `"integer"`
    Integer,
    /// `"boolean"`
    Boolean,
    /// `"null"`
    Null,
    /// `"object"`
    Object,
    /// `"array"`
    Array,
}

impl JsonType {
    /// Every type name, in declaration order.
    pub const ALL: [JsonType; 7] = [
        JsonType::String,
        JsonType::Number,
        JsonType::Integer,
        JsonType::Boolean,
        JsonType::Null,
        JsonType::Object,
        JsonType::Array,
    ];

    /// The schema keyword spelling of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    /// Returns true if a value of `kind` belongs to this type.
    ///
    /// `number` admits integers. `integer` admits only integral numbers;
    /// floats with a zero fractional part are checked by [`admits_value`].
    ///
    /// [`admits_value`]: JsonType::admits_value
    pub fn admits(&self, kind: ValueKind) -> bool {
        matches!(
            (self, kind),
            (Self::String, ValueKind::String)
                | (Self::Number, ValueKind::Integer | ValueKind::Float)
                | (Self::Integer, ValueKind::Integer)
                | (Self::Boolean, ValueKind::Bool)
                | (Self::Null, ValueKind::Null)
                | (Self::Object, ValueKind::Mapping)
                | (Self::Array, ValueKind::Sequence)
        )
    }

    /// Returns true if `value` belongs to this type.
    pub fn admits_value(&self, value: &Value) -> bool {
        if let (Self::Integer, Value::Number(n)) = (self, value) {
            return n.as_f64().is_some_and(|f| f.fract() == 0.0);
        }
        self.admits(ValueKind::of(value))
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JsonType {
    type Err = ClassyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ClassyError::SchemaDefinition {
                subject: "schema literal".to_string(),
                reason: format!("unknown type name '{s}'"),
            })
    }
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// Mapping keys that are numbers or booleans are stringified; YAML tags are
/// dropped and the tagged value is converted in their place.
pub fn yaml_to_json(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<Value>, String> = seq.iter().map(yaml_to_json).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key type: {other:?}")),
                };
                json_map.insert(key, yaml_to_json(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}
