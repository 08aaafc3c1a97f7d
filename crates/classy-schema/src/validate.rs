//! # Validation Gateway
//!
//! Structural validation of decoded values against fully rendered schema
//! documents, delegated to the `jsonschema` crate.
//!
//! ## Contract
//!
//! The document passed in is always the output of [`Schema::render`]: it
//! contains no class references, so the gateway performs no resolution of
//! its own. Failures are reported with the full list of violations
//! (instance path, schema path, message).
//!
//! ## Validator Settings
//!
//! Documents are compiled as JSON Schema Draft 7, where an `items` array
//! describes positional elements. `format` is treated as an annotation and
//! not asserted.

use jsonschema::{Draft, Validator};
use serde_json::Value;

use classy_core::{ClassyError, ValidationViolations, Violation};

use crate::fragment::Schema;

/// Label used for schemas that do not belong to a class.
pub const FRAGMENT_LABEL: &str = "fragment";

/// Compile a rendered document into a `jsonschema` validator.
///
/// # Errors
///
/// Returns `ClassyError::ValidatorBuild` if the document is not a valid
/// JSON Schema.
pub fn build_validator(document: &Value, label: &str) -> Result<Validator, ClassyError> {
    let mut opts = jsonschema::options();
    opts.with_draft(Draft::Draft7).should_validate_formats(false);
    opts.build(document).map_err(|e| ClassyError::ValidatorBuild {
        schema: label.to_string(),
        reason: e.to_string(),
    })
}

/// Validate `instance` against a rendered `document`.
///
/// # Errors
///
/// Returns `ClassyError::SchemaValidation` with structured violation
/// details if the instance is invalid.
pub fn validate_document(
    instance: &Value,
    document: &Value,
    label: &str,
) -> Result<(), ClassyError> {
    let validator = build_validator(document, label)?;
    validate_with(&validator, instance, label)
}

/// Validate `instance` with an already compiled validator.
pub fn validate_with(
    validator: &Validator,
    instance: &Value,
    label: &str,
) -> Result<(), ClassyError> {
    let violations: ValidationViolations = validator
        .iter_errors(instance)
        .map(|e| Violation {
            instance_path: e.instance_path.to_string(),
            schema_path: e.schema_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        tracing::debug!(
            schema = label,
            violations = violations.len(),
            "instance failed validation"
        );
        Err(ClassyError::SchemaValidation {
            schema: label.to_string(),
            violations,
        })
    }
}

impl Schema {
    /// Validate `instance` against this fragment's rendered document.
    pub fn validate(&self, instance: &Value) -> Result<(), ClassyError> {
        let document = self.render()?;
        validate_document(instance, &document, FRAGMENT_LABEL)
    }

    /// Returns true if `instance` passes validation.
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validate(instance).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn module_schema() -> Schema {
        Schema::object()
            .required(["k1", "k2"])
            .property("k1", Schema::string())
            .property("k2", Schema::integer())
            .keyword("additionalProperties", json!(false))
    }

    #[test]
    fn test_validate_valid_document() {
        module_schema()
            .validate(&json!({"k1": "a", "k2": 1}))
            .unwrap();
    }

    #[test]
    fn test_validate_missing_required_field() {
        let err = module_schema().validate(&json!({"k2": 1})).unwrap_err();
        match &err {
            ClassyError::SchemaValidation { schema, violations } => {
                assert_eq!(schema, FRAGMENT_LABEL);
                assert!(!violations.is_empty());
                let has_k1 = violations
                    .violations()
                    .iter()
                    .any(|v| v.message.contains("k1"));
                assert!(has_k1, "Expected violation mentioning 'k1', got: {violations}");
            }
            other => panic!("Expected SchemaValidation, got: {other}"),
        }
    }

    #[test]
    fn test_validate_wrong_primitive_type_reports_path() {
        let err = module_schema()
            .validate(&json!({"k1": "a", "k2": "not an integer"}))
            .unwrap_err();
        match err {
            ClassyError::SchemaValidation { violations, .. } => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations.violations()[0].instance_path, "/k2");
            }
            other => panic!("Expected SchemaValidation, got: {other}"),
        }
    }

    #[test]
    fn test_validate_additional_properties_rejected() {
        let result = module_schema().validate(&json!({"k1": "a", "k2": 1, "extra": true}));
        assert!(
            matches!(result, Err(ClassyError::SchemaValidation { .. })),
            "additionalProperties: false, but extra field was accepted"
        );
    }

    #[test]
    fn test_format_is_not_asserted() {
        let schema = Schema::string().format("date-time");
        assert!(schema.is_valid(&json!("not a timestamp")));
    }

    #[test]
    fn test_positional_items_are_checked_per_position() {
        let schema = Schema::array().positional_items([Schema::string(), Schema::integer()]);
        assert!(schema.is_valid(&json!(["a", 1])));
        assert!(schema.is_valid(&json!(["a", 1, {"anything": true}])));
        assert!(!schema.is_valid(&json!([1, "a"])));
    }

    #[test]
    fn test_compiled_validator_is_reusable() {
        let document = module_schema().render().unwrap();
        let validator = build_validator(&document, "Module").unwrap();
        validate_with(&validator, &json!({"k1": "a", "k2": 1}), "Module").unwrap();
        let err = validate_with(&validator, &json!({"k1": 1}), "Module").unwrap_err();
        assert!(
            matches!(err, ClassyError::SchemaValidation { ref schema, .. } if schema == "Module"),
            "Expected SchemaValidation for Module, got: {err}"
        );
    }

    #[test]
    fn test_invalid_document_fails_to_build() {
        let err = build_validator(&json!({"type": 12}), "broken").unwrap_err();
        assert!(
            matches!(err, ClassyError::ValidatorBuild { ref schema, .. } if schema == "broken"),
            "Expected ValidatorBuild, got: {err}"
        );
    }
}
