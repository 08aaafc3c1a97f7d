//! # classy-core: Foundational Types for classyjson
//!
//! This crate is the leaf of the classyjson workspace. It defines the
//! structured value model every other crate speaks, the JSON Schema type
//! names, input decoding, and the shared error type.
//!
//! ## Key Design Principles
//!
//! 1. **One value model.** Decoded data is `serde_json::Value` with key order
//!    preserved. `ValueKind` classifies a value's base shape and tells
//!    integers from floats.
//!
//! 2. **Closed type names.** `JsonType` is the only way a schema names a
//!    type; unknown names are rejected when a schema literal is parsed.
//!
//! 3. **One error type.** `ClassyError` covers definition, validation,
//!    shape, lookup, decode and IO failures. Nothing is retried internally.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `classy-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod decode;
pub mod error;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use decode::{decode_file, decode_json_str, decode_reader, decode_yaml_str};
pub use error::{ClassyError, ValidationViolations, Violation};
pub use value::{yaml_to_json, JsonType, ValueKind};

/// Result alias used across classyjson.
pub type Result<T, E = ClassyError> = std::result::Result<T, E>;
