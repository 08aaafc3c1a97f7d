//! # Loading
//!
//! Turns a raw decoded value into loaded [`Item`]s under a fragment.
//!
//! Validation runs once, at the outermost call, against the fully rendered
//! document. Nested class positions are then constructed with validation
//! suppressed, since the enclosing document already covered them.
//!
//! ## Projection
//!
//! Object loading iterates the *declared* properties in declaration order:
//!
//! - present keys are converted through their node (class nodes construct an
//!   instance, fragment nodes pass the raw value through, wrapped);
//! - absent keys take the node's default if it has one, and are otherwise
//!   left out of the result;
//! - undeclared input keys are dropped.
//!
//! Array loading applies `items` per element. With positional items, input
//! elements past the last declared position pass through unconverted.

use serde_json::{Map, Value};

use classy_core::{ClassyError, JsonType, ValueKind};

use crate::attrmap::AttrMap;
use crate::fragment::{DefaultValue, Items, Schema, SchemaNode};
use crate::item::Item;

impl Schema {
    /// Load a raw value of any accepted type.
    ///
    /// Mappings are projected when the fragment accepts `object`, sequences
    /// when it accepts `array`. Other values pass through if their base
    /// shape is accepted.
    ///
    /// # Errors
    ///
    /// `SchemaValidation` if `validate` is set and the value is invalid;
    /// `TypeMismatch` if the base shape of `value` is not accepted.
    pub fn load(&self, value: Value, validate: bool) -> Result<Item, ClassyError> {
        if validate {
            self.validate(&value)?;
        }
        match value {
            Value::Object(map) if self.accepts(JsonType::Object) => {
                self.project_object(map).map(Item::Map)
            }
            Value::Array(items) if self.accepts(JsonType::Array) => {
                self.project_array(items).map(Item::List)
            }
            other if self.admits_value(&other) => Ok(Item::from(other)),
            other => Err(ClassyError::TypeMismatch {
                expected: self.type_label(),
                actual: ValueKind::of(&other),
            }),
        }
    }

    /// Load a mapping through this fragment's declared properties.
    ///
    /// # Errors
    ///
    /// `SchemaValidation` if `validate` is set and the value is invalid;
    /// `TypeMismatch` if `value` is not a mapping.
    pub fn load_object(&self, value: Value, validate: bool) -> Result<AttrMap, ClassyError> {
        if validate {
            self.validate(&value)?;
        }
        match value {
            Value::Object(map) => self.project_object(map),
            other => Err(ClassyError::TypeMismatch {
                expected: JsonType::Object.to_string(),
                actual: ValueKind::of(&other),
            }),
        }
    }

    /// Load a sequence through this fragment's `items`.
    ///
    /// # Errors
    ///
    /// `SchemaValidation` if `validate` is set and the value is invalid;
    /// `TypeMismatch` if `value` is not a sequence.
    pub fn load_array(&self, value: Value, validate: bool) -> Result<Vec<Item>, ClassyError> {
        if validate {
            self.validate(&value)?;
        }
        match value {
            Value::Array(items) => self.project_array(items),
            other => Err(ClassyError::TypeMismatch {
                expected: JsonType::Array.to_string(),
                actual: ValueKind::of(&other),
            }),
        }
    }

    fn project_object(&self, mut map: Map<String, Value>) -> Result<AttrMap, ClassyError> {
        let Some(properties) = &self.properties else {
            return Ok(AttrMap::new());
        };

        let mut out = AttrMap::with_capacity(properties.len());
        for (name, node) in properties {
            match map.remove(name) {
                Some(raw) => {
                    tracing::trace!(property = %name, "converting property");
                    out.insert(name.clone(), node.convert(raw)?);
                }
                None => {
                    if let Some(default) = node.default_value()? {
                        tracing::trace!(property = %name, "applying default");
                        out.insert(name.clone(), node.resolve_default(default)?);
                    }
                }
            }
        }

        if !map.is_empty() {
            tracing::trace!(dropped = map.len(), "dropped undeclared keys");
        }
        Ok(out)
    }

    fn project_array(&self, items: Vec<Value>) -> Result<Vec<Item>, ClassyError> {
        match &self.items {
            Some(Items::Single(node)) => items
                .into_iter()
                .enumerate()
                .map(|(index, raw)| {
                    tracing::trace!(index, "converting item");
                    node.convert(raw)
                })
                .collect(),
            Some(Items::Positional(nodes)) => {
                let mut out = Vec::with_capacity(items.len());
                for (index, raw) in items.into_iter().enumerate() {
                    match nodes.get(index) {
                        Some(node) => {
                            tracing::trace!(index, "converting positional item");
                            out.push(node.convert(raw)?);
                        }
                        None => out.push(Item::from(raw)),
                    }
                }
                Ok(out)
            }
            None => Ok(items.into_iter().map(Item::from).collect()),
        }
    }
}

impl SchemaNode {
    /// Convert a raw value found at this position.
    fn convert(&self, raw: Value) -> Result<Item, ClassyError> {
        match self {
            Self::Class(class) => class.construct(raw, false).map(Item::from),
            Self::Fragment(_) => Ok(Item::from(raw)),
        }
    }

    /// Produce the value of an absent position from its default.
    ///
    /// A literal default at a class position is constructed into an
    /// instance of that class with full validation.
    fn resolve_default(&self, default: &DefaultValue) -> Result<Item, ClassyError> {
        match (default, self) {
            (DefaultValue::Class(class), _) => class.construct_default().map(Item::from),
            (DefaultValue::Literal(value), Self::Class(class)) => {
                class.construct(value.clone(), true).map(Item::from)
            }
            (DefaultValue::Literal(value), Self::Fragment(_)) => Ok(Item::from(value.clone())),
        }
    }
}
