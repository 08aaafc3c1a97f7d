//! # classy-cli: CLI Tool for classyjson
//!
//! Provides the `classy` command-line interface over the schema engine.
//!
//! ## Subcommands
//!
//! - `classy validate`: Validate data against a schema literal.
//! - `classy render`: Print the rendered JSON Schema document of a literal.
//! - `classy load`: Load data through a schema (projection and defaults).
//! - `classy config`: Load and print a versioned configuration file.
//!
//! Schema and data arguments accept either a file path or inline JSON:
//!
//! ```bash
//! classy validate --schema schema.json data.yaml
//! classy load --schema '{"properties": {"a": {"type": "integer"}}}' '{"a": 1, "b": 2}'
//! ```
//!
//! ## Exit Codes
//!
//! `0` on success, `1` when the data fails validation, `2` on operational
//! errors (unreadable files, malformed schema literals).

pub mod config;
pub mod load;
pub mod render;
pub mod validate;

use std::io::Write;

use anyhow::{Context, Result};
use serde_json::Value;

use classy_core::ClassyError;
use classy_schema::{Input, Schema};

/// Read a schema literal from a file path or inline JSON text.
pub fn read_schema(arg: &str) -> Result<Schema> {
    let literal = Input::Text(arg)
        .decode()
        .with_context(|| format!("failed to read schema from {arg}"))?;
    Schema::from_value(&literal).context("invalid schema literal")
}

/// Read a data argument from a file path or inline JSON text.
pub fn read_data(arg: &str) -> Result<Value> {
    Input::Text(arg)
        .decode()
        .with_context(|| format!("failed to read data from {arg}"))
}

/// Print the violations of a validation error and return exit code 1.
///
/// Any other error is handed back to the caller unchanged.
pub fn report_validation(out: &mut dyn Write, err: ClassyError) -> Result<u8> {
    match err {
        ClassyError::SchemaValidation { schema, violations } => {
            writeln!(out, "FAIL: {} violation(s) against {schema}", violations.len())?;
            for violation in violations.violations() {
                writeln!(out, "{violation}")?;
            }
            Ok(1)
        }
        other => Err(other.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_schema_inline() {
        let schema = read_schema(r#"{"type": "string", "maxLength": 3}"#).unwrap();
        assert!(schema.is_valid(&json!("abc")));
        assert!(!schema.is_valid(&json!("abcd")));
    }

    #[test]
    fn test_read_schema_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(&path, r#"{"items": {"type": "integer"}}"#).unwrap();
        let schema = read_schema(path.to_str().unwrap()).unwrap();
        assert!(schema.is_valid(&json!([1, 2])));
    }

    #[test]
    fn test_read_schema_rejects_bad_literal() {
        let err = read_schema(r#"{"type": "datetime"}"#).unwrap_err();
        assert!(format!("{err:#}").contains("datetime"));
    }

    #[test]
    fn test_read_data_reports_argument() {
        let err = read_data("{broken").unwrap_err();
        assert!(err.to_string().contains("{broken"));
    }

    #[test]
    fn test_report_validation_lists_violations() {
        let schema = read_schema(r#"{"type": "object", "required": ["a"]}"#).unwrap();
        let err = schema.validate(&json!({})).unwrap_err();
        let mut out = Vec::new();
        let code = report_validation(&mut out, err).unwrap();
        assert_eq!(code, 1);
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("FAIL: 1 violation(s) against fragment"));
        assert!(text.contains("(root)"));
    }

    #[test]
    fn test_report_validation_passes_other_errors_through() {
        let err = ClassyError::IndexOutOfRange { index: 1, len: 0 };
        assert!(report_validation(&mut Vec::new(), err).is_err());
    }
}
