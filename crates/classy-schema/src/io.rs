//! # Load and Dump Entry Points
//!
//! The generic front door of the loader. [`load`] takes an [`Input`] (text,
//! path, decoded value, or open reader) and a [`Select`] deciding what to
//! build from it: the raw value, one class, or the class named by a
//! [`Discriminator`] field. [`dump`] writes instance contents to a
//! [`Destination`].
//!
//! ## Text Inputs
//!
//! `Input::Text` is first tried as a file path: if the string names an
//! existing file, that file is decoded instead of the string itself. Use
//! `Input::Path` or [`decode_json_str`] when the distinction matters.

use std::fmt;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use indexmap::IndexMap;
use serde::ser::{Serialize, Serializer};
use serde_json::Value;

use classy_core::decode::TEXT_ORIGIN;
use classy_core::{decode_file, decode_json_str, decode_reader, ClassyError, ValueKind};

use crate::class::ClassDef;
use crate::instance::{Classy, Instance};

// ─── Input ──────────────────────────────────────────────────────────

/// Where the data to load comes from.
pub enum Input<'a> {
    /// A file path if one exists by that name, otherwise JSON text.
    Text(&'a str),
    /// A JSON or YAML file, chosen by extension.
    Path(&'a Path),
    /// An already decoded value.
    Value(Value),
    /// An open reader holding JSON text.
    Reader(Box<dyn Read + 'a>),
}

impl Input<'_> {
    /// Decode this input into a value.
    ///
    /// # Errors
    ///
    /// `Io` if a file or reader cannot be read; `Decode` if its text is not
    /// valid JSON (or YAML, for YAML files).
    pub fn decode(self) -> Result<Value, ClassyError> {
        match self {
            Self::Text(text) => {
                let path = Path::new(text);
                if path.is_file() {
                    tracing::debug!(path = %path.display(), "text input names a file");
                    decode_file(path)
                } else {
                    decode_json_str(text, TEXT_ORIGIN)
                }
            }
            Self::Path(path) => decode_file(path),
            Self::Value(value) => Ok(value),
            Self::Reader(reader) => decode_reader(reader),
        }
    }
}

impl fmt::Debug for Input<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Reader(_) => f.write_str("Reader(..)"),
        }
    }
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a Path> for Input<'a> {
    fn from(path: &'a Path) -> Self {
        Self::Path(path)
    }
}

impl From<Value> for Input<'_> {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

// ─── Discriminator ──────────────────────────────────────────────────

/// Selects a class by the value of one input field.
#[derive(Debug, Clone)]
pub struct Discriminator {
    field: String,
    variants: IndexMap<String, &'static ClassDef>,
}

impl Discriminator {
    /// A discriminator on `field` with no variants yet.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            variants: IndexMap::new(),
        }
    }

    /// Register `class` for inputs whose field equals `value`.
    pub fn variant(mut self, value: impl Into<String>, class: &'static ClassDef) -> Self {
        self.variants.insert(value.into(), class);
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Registered variant values, in registration order.
    pub fn variant_names(&self) -> Vec<String> {
        self.variants.keys().cloned().collect()
    }

    /// Pick the class for a decoded value.
    ///
    /// String field values are matched as-is; any other value is matched by
    /// its JSON text, so `version: 2` selects a variant registered as `"2"`.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` if `value` is not a mapping; `MissingKey` if the field
    /// is absent; `UnknownVariant` if no variant matches.
    pub fn select(&self, value: &Value) -> Result<&'static ClassDef, ClassyError> {
        let map = value.as_object().ok_or_else(|| ClassyError::TypeMismatch {
            expected: "object".to_string(),
            actual: ValueKind::of(value),
        })?;
        let tag = map
            .get(&self.field)
            .ok_or_else(|| ClassyError::missing_key(&self.field, map.keys()))?;
        let name = match tag {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let class = self
            .variants
            .get(&name)
            .copied()
            .ok_or_else(|| ClassyError::UnknownVariant {
                field: self.field.clone(),
                value: tag.to_string(),
                known: self.variant_names(),
            })?;
        tracing::debug!(
            field = %self.field,
            variant = %name,
            class = class.name(),
            "discriminator selected class"
        );
        Ok(class)
    }
}

// ─── Load ───────────────────────────────────────────────────────────

/// What [`load`] builds from the decoded value.
#[derive(Debug, Clone, Copy)]
pub enum Select<'a> {
    /// Return the decoded value untouched.
    Raw,
    /// Construct this class with full validation.
    Class(&'static ClassDef),
    /// Construct the class named by the discriminator field.
    Discriminator(&'a Discriminator),
}

impl From<&'static ClassDef> for Select<'_> {
    fn from(class: &'static ClassDef) -> Self {
        Self::Class(class)
    }
}

impl<'a> From<&'a Discriminator> for Select<'a> {
    fn from(discriminator: &'a Discriminator) -> Self {
        Self::Discriminator(discriminator)
    }
}

/// The result of [`load`].
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded {
    /// The decoded value, for `Select::Raw`.
    Raw(Value),
    /// A constructed class instance.
    Instance(Instance),
}

impl Loaded {
    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Self::Instance(instance) => Some(instance),
            Self::Raw(_) => None,
        }
    }

    /// Unwrap the instance.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` for raw results.
    pub fn into_instance(self) -> Result<Instance, ClassyError> {
        match self {
            Self::Instance(instance) => Ok(instance),
            Self::Raw(value) => Err(ClassyError::TypeMismatch {
                expected: "class instance".to_string(),
                actual: ValueKind::of(&value),
            }),
        }
    }

    /// The class of the instance, if any.
    pub fn class(&self) -> Option<&'static ClassDef> {
        self.as_instance().map(Instance::class)
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Raw(value) => value.clone(),
            Self::Instance(instance) => instance.to_value(),
        }
    }
}

impl PartialEq<Value> for Loaded {
    fn eq(&self, other: &Value) -> bool {
        self.to_value() == *other
    }
}

impl Serialize for Loaded {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Raw(value) => value.serialize(serializer),
            Self::Instance(instance) => instance.serialize(serializer),
        }
    }
}

/// Decode `input` and build what `select` asks for.
///
/// # Errors
///
/// Decoding errors from the input; `TypeMismatch`, `MissingKey` or
/// `UnknownVariant` from discriminator selection; any error of class
/// construction.
pub fn load<'a>(input: impl Into<Input<'a>>, select: Select<'_>) -> Result<Loaded, ClassyError> {
    let value = input.into().decode()?;
    match select {
        Select::Raw => Ok(Loaded::Raw(value)),
        Select::Class(class) => class.load(value).map(Loaded::Instance),
        Select::Discriminator(discriminator) => {
            let class = discriminator.select(&value)?;
            class.load(value).map(Loaded::Instance)
        }
    }
}

/// [`load`] for text input.
pub fn loads(text: &str, select: Select<'_>) -> Result<Loaded, ClassyError> {
    load(Input::Text(text), select)
}

/// Load `input` as the class behind `T` and wrap it.
pub fn load_as<'a, T: Classy>(input: impl Into<Input<'a>>) -> Result<T, ClassyError> {
    let instance = load(input, Select::Class(T::class()))?.into_instance()?;
    T::from_instance(instance)
}

// ─── Dump ───────────────────────────────────────────────────────────

/// Where [`dump`] writes.
pub enum Destination<'a> {
    /// Return the text.
    Text,
    /// Create or truncate this file.
    Path(&'a Path),
    /// Write to an open writer.
    Writer(&'a mut dyn Write),
}

/// Output layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    #[default]
    Compact,
    Pretty,
}

/// Serialize `value` compactly to `destination`.
///
/// Returns `Some(text)` for `Destination::Text` and `None` otherwise.
pub fn dump<T: Serialize + ?Sized>(
    value: &T,
    destination: Destination<'_>,
) -> Result<Option<String>, ClassyError> {
    dump_with(value, destination, Style::Compact)
}

/// [`dump`] with an explicit [`Style`].
pub fn dump_with<T: Serialize + ?Sized>(
    value: &T,
    destination: Destination<'_>,
    style: Style,
) -> Result<Option<String>, ClassyError> {
    let text = match style {
        Style::Compact => serde_json::to_string(value)?,
        Style::Pretty => serde_json::to_string_pretty(value)?,
    };
    match destination {
        Destination::Text => Ok(Some(text)),
        Destination::Path(path) => {
            fs::write(path, text)?;
            tracing::debug!(path = %path.display(), "dumped to file");
            Ok(None)
        }
        Destination::Writer(writer) => {
            writer.write_all(text.as_bytes())?;
            Ok(None)
        }
    }
}

/// Serialize `value` to compact JSON text.
pub fn dumps<T: Serialize + ?Sized>(value: &T) -> Result<String, ClassyError> {
    Ok(serde_json::to_string(value)?)
}
