//! # classy-schema: Schema Composition & Loading Engine
//!
//! Builds schema fragments, composes them by union, validates decoded values
//! against the rendered JSON Schema documents, and loads those values into
//! typed class instances with attribute-style access.
//!
//! ## Fragments (`fragment`, `compose`, `literal`)
//!
//! A [`Schema`] is built with typed constructors and builders, parsed from a
//! literal with [`Schema::from_value`], or widened with `a + b`. Nested
//! positions hold a [`SchemaNode`]: an inline fragment or a class reference.
//! [`Schema::render`] substitutes every class reference with the class's own
//! document.
//!
//! ## Classes (`class`, `instance`)
//!
//! A [`ClassDef`] lives in a `static` and materializes its schema once, on
//! first use. [`ClassDef::construct`] validates, loads, and runs the
//! post-construction hook, producing an [`Instance`].
//!
//! ## Loading (`load`, `attrmap`, `item`)
//!
//! [`Schema::load_object`] and [`Schema::load_array`] project raw values
//! onto declared properties and items, resolve defaults, and wrap every
//! nested mapping in an [`AttrMap`].
//!
//! ## Entry Points (`io`)
//!
//! - [`load()`] / [`loads()`]: decode an [`Input`] and build what a [`Select`]
//!   asks for, including [`Discriminator`] dispatch.
//! - [`dump()`] / [`dumps()`]: serialize instance contents to a [`Destination`].
//!
//! ## Crate Policy
//!
//! - Depends only on `classy-core` internally.
//! - Validation is delegated to `jsonschema`; the document handed to it is
//!   always fully rendered.
//! - Every failure is returned as `ClassyError`; nothing is retried.

pub mod attrmap;
pub mod class;
pub mod compose;
pub mod fragment;
pub mod instance;
pub mod io;
pub mod item;
pub mod literal;
pub mod load;
pub mod validate;

pub use attrmap::AttrMap;
pub use class::{ClassDef, Declare, Hook, Shape};
pub use fragment::{DefaultValue, Items, Schema, SchemaNode, RESERVED_KEYWORDS};
pub use instance::{Classy, ClassyArray, ClassyObject, Instance};
pub use io::{
    dump, dump_with, dumps, load, load_as, loads, Destination, Discriminator, Input, Loaded,
    Select, Style,
};
pub use item::Item;
pub use validate::{build_validator, validate_document, validate_with, FRAGMENT_LABEL};
