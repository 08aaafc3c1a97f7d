//! # Loaded Items
//!
//! [`Item`] is the value type of a loaded instance graph. Scalars and
//! sequences mirror the decoded value; every mapping becomes an [`AttrMap`];
//! positions declared with a typed class hold that class's instance.
//!
//! Converting a `serde_json::Value` into an `Item` is the recursive wrapping
//! step: there is no variant for a plain mapping.

use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::{Number, Value};

use classy_core::{ClassyError, ValueKind};

use crate::attrmap::AttrMap;
use crate::instance::{ClassyArray, ClassyObject, Instance};

/// A node of a loaded instance graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// `null`, or an absent value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number, integer or float.
    Number(Number),
    /// A string.
    String(String),
    /// A sequence with no class of its own.
    List(Vec<Item>),
    /// A mapping with no class of its own.
    Map(AttrMap),
    /// An instance of an object-shaped class.
    Object(ClassyObject),
    /// An instance of an array-shaped class.
    Array(ClassyArray),
}

impl Item {
    /// The base shape of this item.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Number(n) if n.is_i64() || n.is_u64() => ValueKind::Integer,
            Self::Number(_) => ValueKind::Float,
            Self::String(_) => ValueKind::String,
            Self::List(_) | Self::Array(_) => ValueKind::Sequence,
            Self::Map(_) | Self::Object(_) => ValueKind::Mapping,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The mapping behind a plain map or an object instance.
    pub fn as_map(&self) -> Option<&AttrMap> {
        match self {
            Self::Map(map) => Some(map),
            Self::Object(obj) => Some(obj.fields()),
            _ => None,
        }
    }

    /// Mutable variant of [`as_map`](Item::as_map).
    pub fn as_map_mut(&mut self) -> Option<&mut AttrMap> {
        match self {
            Self::Map(map) => Some(map),
            Self::Object(obj) => Some(obj.fields_mut()),
            _ => None,
        }
    }

    /// The elements behind a plain list or an array instance.
    pub fn as_list(&self) -> Option<&[Item]> {
        match self {
            Self::List(items) => Some(items),
            Self::Array(arr) => Some(arr.items()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ClassyObject> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ClassyArray> {
        match self {
            Self::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Look up `key` in a mapping item.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` if this item is not a mapping; `MissingKey` if the key
    /// is absent.
    pub fn attr(&self, key: &str) -> Result<&Item, ClassyError> {
        self.as_map()
            .ok_or_else(|| ClassyError::TypeMismatch {
                expected: "object".to_string(),
                actual: self.kind(),
            })?
            .attr(key)
    }

    /// Look up position `index` in a sequence item.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` if this item is not a sequence; `IndexOutOfRange` past
    /// the end.
    pub fn at(&self, index: usize) -> Result<&Item, ClassyError> {
        let items = self.as_list().ok_or_else(|| ClassyError::TypeMismatch {
            expected: "array".to_string(),
            actual: self.kind(),
        })?;
        items.get(index).ok_or(ClassyError::IndexOutOfRange {
            index,
            len: items.len(),
        })
    }

    /// Look up `key` without failing.
    pub fn get(&self, key: &str) -> Option<&Item> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Convert back to a plain JSON value. Class metadata is dropped.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::String(s) => Value::String(s.clone()),
            Self::List(items) => Value::Array(items.iter().map(Item::to_value).collect()),
            Self::Array(arr) => arr.to_value(),
            Self::Map(map) => map.to_value(),
            Self::Object(obj) => obj.to_value(),
        }
    }
}

impl From<Value> for Item {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(items.into_iter().map(Item::from).collect()),
            Value::Object(map) => Self::Map(AttrMap::from(map)),
        }
    }
}

impl From<AttrMap> for Item {
    fn from(map: AttrMap) -> Self {
        Self::Map(map)
    }
}

impl From<Vec<Item>> for Item {
    fn from(items: Vec<Item>) -> Self {
        Self::List(items)
    }
}

impl From<Instance> for Item {
    fn from(instance: Instance) -> Self {
        match instance {
            Instance::Object(obj) => Self::Object(obj),
            Instance::Array(arr) => Self::Array(arr),
        }
    }
}

impl From<ClassyObject> for Item {
    fn from(obj: ClassyObject) -> Self {
        Self::Object(obj)
    }
}

impl From<ClassyArray> for Item {
    fn from(arr: ClassyArray) -> Self {
        Self::Array(arr)
    }
}

impl From<bool> for Item {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Item {
    fn from(n: i32) -> Self {
        Self::Number(Number::from(n))
    }
}

impl From<i64> for Item {
    fn from(n: i64) -> Self {
        Self::Number(Number::from(n))
    }
}

impl From<u64> for Item {
    fn from(n: u64) -> Self {
        Self::Number(Number::from(n))
    }
}

/// Non-finite floats have no JSON form and become `Null`.
impl From<f64> for Item {
    fn from(f: f64) -> Self {
        Number::from_f64(f).map_or(Self::Null, Self::Number)
    }
}

impl From<&str> for Item {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Item {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl PartialEq<Value> for Item {
    fn eq(&self, other: &Value) -> bool {
        self.to_value() == *other
    }
}

impl Serialize for Item {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::List(items) => serialize_items(items, serializer),
            Self::Array(arr) => serialize_items(arr.items(), serializer),
            Self::Map(map) => map.serialize(serializer),
            Self::Object(obj) => obj.fields().serialize(serializer),
        }
    }
}

pub(crate) fn serialize_items<S: Serializer>(
    items: &[Item],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(items.len()))?;
    for item in items {
        seq.serialize_element(item)?;
    }
    seq.end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_wraps_mappings_inside_sequences() {
        let item = Item::from(json!([{"a": [{"b": true}]}]));
        let inner = item.at(0).unwrap().attr("a").unwrap().at(0).unwrap();
        assert!(matches!(inner, Item::Map(_)));
        assert_eq!(inner.attr("b").unwrap().as_bool(), Some(true));
    }

    #[test]
    fn test_to_value_roundtrip() {
        let value = json!({"k1": "foo", "k2": [1, 2.5, null, {"x": false}]});
        assert_eq!(Item::from(value.clone()).to_value(), value);
    }

    #[test]
    fn test_kind() {
        assert_eq!(Item::from(json!(1)).kind(), ValueKind::Integer);
        assert_eq!(Item::from(json!(1.5)).kind(), ValueKind::Float);
        assert_eq!(Item::from(json!({})).kind(), ValueKind::Mapping);
        assert_eq!(Item::from(json!([])).kind(), ValueKind::Sequence);
    }

    #[test]
    fn test_attr_on_non_mapping_is_type_mismatch() {
        let err = Item::from(json!([1])).attr("a").unwrap_err();
        assert!(matches!(
            err,
            ClassyError::TypeMismatch { actual: ValueKind::Sequence, .. }
        ));
    }

    #[test]
    fn test_at_out_of_range() {
        let err = Item::from(json!([1, 2])).at(5).unwrap_err();
        assert!(matches!(err, ClassyError::IndexOutOfRange { index: 5, len: 2 }));
    }

    #[test]
    fn test_non_finite_float_is_null() {
        assert!(Item::from(f64::NAN).is_null());
        assert_eq!(Item::from(2.5).as_f64(), Some(2.5));
    }

    #[test]
    fn test_serialize_matches_to_value() {
        let item = Item::from(json!({"a": [1, {"b": "c"}], "d": null}));
        let serialized = serde_json::to_value(&item).unwrap();
        assert_eq!(serialized, item.to_value());
    }

    #[test]
    fn test_get_is_lenient() {
        let item = Item::from(json!({"a": 1}));
        assert!(item.get("a").is_some());
        assert!(item.get("b").is_none());
        assert!(Item::from(json!(3)).get("a").is_none());
    }
}
