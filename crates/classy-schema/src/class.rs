//! # Typed Classes
//!
//! A [`ClassDef`] pairs a schema declaration with a shape (object or array)
//! and lives in a `static`:
//!
//! ```
//! use classy_schema::{ClassDef, Schema};
//!
//! fn point_schema() -> Result<Schema, classy_core::ClassyError> {
//!     Ok(Schema::object()
//!         .property("x", Schema::number())
//!         .property("y", Schema::number())
//!         .required(["x", "y"]))
//! }
//!
//! static POINT: ClassDef = ClassDef::object("Point", point_schema);
//!
//! let point = POINT.load(serde_json::json!({"x": 1, "y": 2.5})).unwrap();
//! assert_eq!(point.class().name(), "Point");
//! ```
//!
//! ## Schema Materialization
//!
//! The declaration function runs once, on first use, and its result is
//! frozen for the life of the process together with its rendered document
//! and compiled validator. All three live in `once_cell::sync::OnceCell`s,
//! so concurrent first use from several threads still materializes exactly
//! once.
//!
//! ## Construction Lifecycle
//!
//! `construct` validates the raw value (unless told not to), loads it through
//! the class schema, populates the instance, then runs the post-construction
//! hook once. Any failure returns `Err`; no partial instance escapes.

use std::fmt;

use jsonschema::Validator;
use once_cell::sync::OnceCell;
use serde_json::Value;

use classy_core::{ClassyError, JsonType};

use crate::fragment::Schema;
use crate::instance::{ClassyArray, ClassyObject, Instance};
use crate::validate::{build_validator, validate_with};

/// Declares the schema of a class.
pub type Declare = fn() -> Result<Schema, ClassyError>;

/// Runs once after an instance is populated.
pub type Hook = fn(&mut Instance) -> Result<(), ClassyError>;

/// Whether a class behaves as a mapping or as a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Loads into a [`ClassyObject`].
    Object,
    /// Loads into a [`ClassyArray`].
    Array,
}

impl Shape {
    /// The JSON type this shape requires of its schema.
    pub fn json_type(&self) -> JsonType {
        match self {
            Self::Object => JsonType::Object,
            Self::Array => JsonType::Array,
        }
    }

    /// The empty input used for default construction.
    pub fn empty_value(&self) -> Value {
        match self {
            Self::Object => Value::Object(serde_json::Map::new()),
            Self::Array => Value::Array(Vec::new()),
        }
    }
}

/// A schema-backed class declaration.
pub struct ClassDef {
    name: &'static str,
    shape: Shape,
    declare: Declare,
    hook: Option<Hook>,
    schema: OnceCell<Schema>,
    document: OnceCell<Value>,
    validator: OnceCell<Validator>,
}

impl ClassDef {
    /// Declare a class. Usable in `static` items.
    pub const fn new(
        name: &'static str,
        shape: Shape,
        declare: Declare,
        hook: Option<Hook>,
    ) -> Self {
        Self {
            name,
            shape,
            declare,
            hook,
            schema: OnceCell::new(),
            document: OnceCell::new(),
            validator: OnceCell::new(),
        }
    }

    /// Declare an object-shaped class.
    pub const fn object(name: &'static str, declare: Declare) -> Self {
        Self::new(name, Shape::Object, declare, None)
    }

    /// Declare an object-shaped class with a post-construction hook.
    pub const fn object_with_hook(name: &'static str, declare: Declare, hook: Hook) -> Self {
        Self::new(name, Shape::Object, declare, Some(hook))
    }

    /// Declare an array-shaped class.
    pub const fn array(name: &'static str, declare: Declare) -> Self {
        Self::new(name, Shape::Array, declare, None)
    }

    /// Declare an array-shaped class with a post-construction hook.
    pub const fn array_with_hook(name: &'static str, declare: Declare, hook: Hook) -> Self {
        Self::new(name, Shape::Array, declare, Some(hook))
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// The materialized class schema, built on first use.
    ///
    /// # Errors
    ///
    /// Returns `ClassyError::SchemaDefinition` if the declaration fails or
    /// its type set does not include the class shape.
    pub fn schema(&self) -> Result<&Schema, ClassyError> {
        self.schema.get_or_try_init(|| {
            let schema = (self.declare)().map_err(|e| match e {
                ClassyError::SchemaDefinition { reason, .. } => ClassyError::SchemaDefinition {
                    subject: self.name.to_string(),
                    reason,
                },
                other => other,
            })?;
            let required = self.shape.json_type();
            if !schema.accepts(required) {
                return Err(ClassyError::SchemaDefinition {
                    subject: self.name.to_string(),
                    reason: format!(
                        "{:?}-shaped class needs type '{required}', schema declares '{}'",
                        self.shape,
                        schema.type_label()
                    ),
                });
            }
            tracing::debug!(class = self.name, shape = ?self.shape, "materialized class schema");
            Ok(schema)
        })
    }

    /// The rendered document of the class schema, built on first use.
    pub fn document(&self) -> Result<&Value, ClassyError> {
        self.document.get_or_try_init(|| self.schema()?.render())
    }

    /// The compiled validator for the class document, built on first use.
    pub fn validator(&self) -> Result<&Validator, ClassyError> {
        self.validator.get_or_try_init(|| build_validator(self.document()?, self.name))
    }

    /// Validate a raw value against the class document.
    pub fn validate(&self, instance: &Value) -> Result<(), ClassyError> {
        validate_with(self.validator()?, instance, self.name)
    }

    /// Build an instance from a raw value.
    ///
    /// `validate = false` skips structural validation; it is used for nested
    /// positions whose enclosing document was already validated.
    pub fn construct(&'static self, value: Value, validate: bool) -> Result<Instance, ClassyError> {
        let schema = self.schema()?;
        if validate {
            self.validate(&value)?;
        }

        let mut instance = match self.shape {
            Shape::Object => {
                let fields = schema.load_object(value, false)?;
                Instance::Object(ClassyObject::from_parts(self, fields))
            }
            Shape::Array => {
                let items = schema.load_array(value, false)?;
                Instance::Array(ClassyArray::from_parts(self, items))
            }
        };

        if let Some(hook) = self.hook {
            hook(&mut instance)?;
        }
        Ok(instance)
    }

    /// Build an instance with full validation.
    pub fn load(&'static self, value: Value) -> Result<Instance, ClassyError> {
        self.construct(value, true)
    }

    /// Build an instance from the empty input (`{}` or `[]`).
    pub fn construct_default(&'static self) -> Result<Instance, ClassyError> {
        self.construct(self.shape.empty_value(), true)
    }
}

impl fmt::Debug for ClassDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDef")
            .field("name", &self.name)
            .field("shape", &self.shape)
            .field("materialized", &self.schema.get().is_some())
            .finish()
    }
}

/// Classes are compared by identity.
impl PartialEq for ClassDef {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}
