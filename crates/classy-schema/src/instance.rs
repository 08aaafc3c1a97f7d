//! # Typed Instances
//!
//! Instances of object-shaped classes are [`ClassyObject`]s and dereference
//! to their [`AttrMap`]; instances of array-shaped classes are
//! [`ClassyArray`]s and dereference to their `Vec<Item>`. Both remember the
//! class they were built from, and both serialize as their contents only.
//!
//! The [`Classy`] trait lets a user newtype wrap an instance and add its own
//! methods over the loaded data.

use std::ops::{Deref, DerefMut};

use serde::ser::{Serialize, Serializer};
use serde_json::Value;

use classy_core::{ClassyError, ValueKind};

use crate::attrmap::AttrMap;
use crate::class::ClassDef;
use crate::item::{serialize_items, Item};

/// An instance of an object-shaped class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassyObject {
    class: &'static ClassDef,
    fields: AttrMap,
}

impl ClassyObject {
    pub(crate) fn from_parts(class: &'static ClassDef, fields: AttrMap) -> Self {
        Self { class, fields }
    }

    /// The class this instance was built from.
    pub fn class(&self) -> &'static ClassDef {
        self.class
    }

    pub fn fields(&self) -> &AttrMap {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut AttrMap {
        &mut self.fields
    }

    pub fn into_fields(self) -> AttrMap {
        self.fields
    }

    pub fn to_value(&self) -> Value {
        self.fields.to_value()
    }
}

impl Deref for ClassyObject {
    type Target = AttrMap;

    fn deref(&self) -> &AttrMap {
        &self.fields
    }
}

impl DerefMut for ClassyObject {
    fn deref_mut(&mut self) -> &mut AttrMap {
        &mut self.fields
    }
}

impl PartialEq<Value> for ClassyObject {
    fn eq(&self, other: &Value) -> bool {
        self.to_value() == *other
    }
}

impl Serialize for ClassyObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// An instance of an array-shaped class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassyArray {
    class: &'static ClassDef,
    items: Vec<Item>,
}

impl ClassyArray {
    pub(crate) fn from_parts(class: &'static ClassDef, items: Vec<Item>) -> Self {
        Self { class, items }
    }

    /// The class this instance was built from.
    pub fn class(&self) -> &'static ClassDef {
        self.class
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Item> {
        self.items
    }

    pub fn to_value(&self) -> Value {
        Value::Array(self.items.iter().map(Item::to_value).collect())
    }
}

impl Deref for ClassyArray {
    type Target = Vec<Item>;

    fn deref(&self) -> &Vec<Item> {
        &self.items
    }
}

impl DerefMut for ClassyArray {
    fn deref_mut(&mut self) -> &mut Vec<Item> {
        &mut self.items
    }
}

impl PartialEq<Value> for ClassyArray {
    fn eq(&self, other: &Value) -> bool {
        self.to_value() == *other
    }
}

impl Serialize for ClassyArray {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_items(&self.items, serializer)
    }
}

/// An instance of any class.
#[derive(Debug, Clone, PartialEq)]
pub enum Instance {
    Object(ClassyObject),
    Array(ClassyArray),
}

impl Instance {
    /// The class this instance was built from.
    pub fn class(&self) -> &'static ClassDef {
        match self {
            Self::Object(obj) => obj.class(),
            Self::Array(arr) => arr.class(),
        }
    }

    pub fn as_object(&self) -> Option<&ClassyObject> {
        match self {
            Self::Object(obj) => Some(obj),
            Self::Array(_) => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ClassyObject> {
        match self {
            Self::Object(obj) => Some(obj),
            Self::Array(_) => None,
        }
    }

    pub fn as_array(&self) -> Option<&ClassyArray> {
        match self {
            Self::Array(arr) => Some(arr),
            Self::Object(_) => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut ClassyArray> {
        match self {
            Self::Array(arr) => Some(arr),
            Self::Object(_) => None,
        }
    }

    /// Unwrap an object instance.
    ///
    /// # Errors
    ///
    /// Returns `ClassyError::TypeMismatch` for array instances.
    pub fn into_object(self) -> Result<ClassyObject, ClassyError> {
        match self {
            Self::Object(obj) => Ok(obj),
            Self::Array(_) => Err(ClassyError::TypeMismatch {
                expected: "object".to_string(),
                actual: ValueKind::Sequence,
            }),
        }
    }

    /// Unwrap an array instance.
    ///
    /// # Errors
    ///
    /// Returns `ClassyError::TypeMismatch` for object instances.
    pub fn into_array(self) -> Result<ClassyArray, ClassyError> {
        match self {
            Self::Array(arr) => Ok(arr),
            Self::Object(_) => Err(ClassyError::TypeMismatch {
                expected: "array".to_string(),
                actual: ValueKind::Mapping,
            }),
        }
    }

    /// Look up a field of an object instance.
    pub fn attr(&self, key: &str) -> Result<&Item, ClassyError> {
        match self {
            Self::Object(obj) => obj.attr(key),
            Self::Array(_) => Err(ClassyError::TypeMismatch {
                expected: "object".to_string(),
                actual: ValueKind::Sequence,
            }),
        }
    }

    /// Look up a position of an array instance.
    pub fn at(&self, index: usize) -> Result<&Item, ClassyError> {
        match self {
            Self::Array(arr) => arr.get(index).ok_or(ClassyError::IndexOutOfRange {
                index,
                len: arr.len(),
            }),
            Self::Object(_) => Err(ClassyError::TypeMismatch {
                expected: "array".to_string(),
                actual: ValueKind::Mapping,
            }),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Object(obj) => obj.to_value(),
            Self::Array(arr) => arr.to_value(),
        }
    }
}

impl PartialEq<Value> for Instance {
    fn eq(&self, other: &Value) -> bool {
        self.to_value() == *other
    }
}

impl Serialize for Instance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Object(obj) => obj.serialize(serializer),
            Self::Array(arr) => arr.serialize(serializer),
        }
    }
}

/// A user type backed by a class instance.
///
/// ```
/// use classy_core::ClassyError;
/// use classy_schema::{ClassDef, Classy, ClassyObject, Instance, Schema};
///
/// fn planet_schema() -> Result<Schema, ClassyError> {
///     Ok(Schema::object()
///         .property("age", Schema::number())
///         .property("population", Schema::number()))
/// }
///
/// static PLANET: ClassDef = ClassDef::object("Planet", planet_schema);
///
/// struct Planet(ClassyObject);
///
/// impl Classy for Planet {
///     fn class() -> &'static ClassDef {
///         &PLANET
///     }
///
///     fn from_instance(instance: Instance) -> Result<Self, ClassyError> {
///         instance.into_object().map(Planet)
///     }
/// }
///
/// impl Planet {
///     fn combined_age_population(&self) -> f64 {
///         let age = self.0.get("age").and_then(|i| i.as_f64()).unwrap_or(f64::NAN);
///         let pop = self.0.get("population").and_then(|i| i.as_f64()).unwrap_or(f64::NAN);
///         age * pop
///     }
/// }
///
/// let planet = Planet::from_value(serde_json::json!({"age": 2, "population": 3})).unwrap();
/// assert_eq!(planet.combined_age_population(), 6.0);
/// ```
pub trait Classy: Sized {
    /// The class backing this type.
    fn class() -> &'static ClassDef;

    /// Wrap a constructed instance.
    fn from_instance(instance: Instance) -> Result<Self, ClassyError>;

    /// Construct from a raw value with full validation.
    fn from_value(value: Value) -> Result<Self, ClassyError> {
        Self::from_instance(Self::class().construct(value, true)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::Schema;
    use serde_json::json;

    fn row_schema() -> Result<Schema, ClassyError> {
        Ok(Schema::object().property("id", Schema::integer()))
    }

    static ROW: ClassDef = ClassDef::object("Row", row_schema);

    fn rows_schema() -> Result<Schema, ClassyError> {
        Ok(Schema::array().items(&ROW))
    }

    static ROWS: ClassDef = ClassDef::array("Rows", rows_schema);

    #[test]
    fn test_object_derefs_to_attrmap() {
        let mut row = ROW.load(json!({"id": 7})).unwrap().into_object().unwrap();
        assert_eq!(row.attr("id").unwrap().as_i64(), Some(7));
        row.insert("note", "added");
        assert_eq!(row.len(), 2);
        assert_eq!(row.class().name(), "Row");
    }

    #[test]
    fn test_array_derefs_to_vec() {
        let mut rows = ROWS.load(json!([{"id": 1}, {"id": 2}])).unwrap().into_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert!(matches!(rows[0], Item::Object(_)));
        rows.push(Item::from(json!({"id": 3})));
        assert_eq!(rows, json!([{"id": 1}, {"id": 2}, {"id": 3}]));
    }

    #[test]
    fn test_serialize_contents_only() {
        let rows = ROWS.load(json!([{"id": 1}])).unwrap();
        assert_eq!(serde_json::to_string(&rows).unwrap(), r#"[{"id":1}]"#);
    }

    #[test]
    fn test_into_wrong_shape_fails() {
        let row = ROW.load(json!({})).unwrap();
        assert!(matches!(row.clone().into_array(), Err(ClassyError::TypeMismatch { .. })));
        assert!(matches!(row.at(0), Err(ClassyError::TypeMismatch { .. })));
        let rows = ROWS.load(json!([])).unwrap();
        assert!(matches!(rows.attr("id"), Err(ClassyError::TypeMismatch { .. })));
        assert!(matches!(rows.at(0), Err(ClassyError::IndexOutOfRange { index: 0, len: 0 })));
    }

    #[test]
    fn test_instance_equals_its_input() {
        let data = json!({"id": 3});
        assert_eq!(ROW.load(data.clone()).unwrap(), data);
    }
}
