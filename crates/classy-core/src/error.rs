//! # Error Types: Structured Error Hierarchy
//!
//! Defines the single error type shared by every classyjson crate. All
//! errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Nothing is retried or recovered internally; every variant reaches the
//!   caller of `load` or of class construction.
//! - Validation errors carry the full structured violation list reported by
//!   the validator (instance path, schema path, message).
//! - Lookup errors carry the attempted key and the keys that do exist.

use std::fmt;

use thiserror::Error;

use crate::value::ValueKind;

/// Top-level error type for classyjson.
#[derive(Error, Debug)]
pub enum ClassyError {
    /// A class or schema literal does not describe a usable schema.
    #[error("schema definition error for {subject}: {reason}")]
    SchemaDefinition {
        /// Class name, or a description of the literal being parsed.
        subject: String,
        /// What is wrong with the definition.
        reason: String,
    },

    /// The instance did not conform to the rendered schema document.
    #[error("validation failed against schema '{schema}':\n{violations}")]
    SchemaValidation {
        /// Class name, or `fragment` for anonymous schemas.
        schema: String,
        /// Structured list of individual violations.
        violations: ValidationViolations,
    },

    /// The rendered schema document could not be compiled by the validator.
    #[error("validator build error for schema '{schema}': {reason}")]
    ValidatorBuild {
        /// Class name, or `fragment` for anonymous schemas.
        schema: String,
        /// Reason reported by the validator.
        reason: String,
    },

    /// The decoded base shape does not match the shape the schema expects.
    #[error("wrong base type: expected {expected}, found {actual}")]
    TypeMismatch {
        /// The accepted type names, e.g. `object` or `string | null`.
        expected: String,
        /// The kind of value actually supplied.
        actual: ValueKind,
    },

    /// A discriminator value has no registered class.
    #[error("unknown variant {value} for discriminator '{field}'; known variants: {known:?}")]
    UnknownVariant {
        /// The discriminator field name.
        field: String,
        /// The value found in the input, rendered as JSON.
        value: String,
        /// Registered variant names, in registration order.
        known: Vec<String>,
    },

    /// An attribute lookup named a key that is not present.
    #[error("'{key}' not in {known:?}")]
    MissingKey {
        /// The key that was requested.
        key: String,
        /// The keys present in the mapping, in order.
        known: Vec<String>,
    },

    /// A positional lookup went past the end of a sequence.
    #[error("index {index} out of range for sequence of length {len}")]
    IndexOutOfRange {
        /// The requested position.
        index: usize,
        /// Length of the sequence.
        len: usize,
    },

    /// A post-construction hook rejected the freshly loaded instance.
    #[error("post-construction hook for {class} failed: {reason}")]
    Hook {
        /// Name of the class whose hook failed.
        class: String,
        /// Reason given by the hook.
        reason: String,
    },

    /// Input text or a file could not be decoded.
    #[error("decode error for '{origin}': {reason}")]
    Decode {
        /// Where the input came from (file path, `<text>`, `<reader>`).
        origin: String,
        /// Reason reported by the decoder.
        reason: String,
    },

    /// JSON serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClassyError {
    /// Build a `MissingKey` error from any iterator of known keys.
    pub fn missing_key<'a>(key: &str, known: impl IntoIterator<Item = &'a String>) -> Self {
        Self::MissingKey {
            key: key.to_string(),
            known: known.into_iter().cloned().collect(),
        }
    }

    /// Returns true for errors raised by structural validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::SchemaValidation { .. })
    }
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer path to the violating field in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Wrap a list of violations.
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl FromIterator<Violation> for ValidationViolations {
    fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}
