//! # Union Composition
//!
//! `a + b` (or `a.union(b)`) produces a fragment accepting every value
//! accepted by either operand.
//!
//! ## Merge Rules
//!
//! - `type`: A's types in their original order, then B's types not already
//!   present.
//! - Every other keyword present in B overwrites the same keyword in A.
//!   Pass-through keywords are overwritten one by one, so A's `format`
//!   survives unless B sets its own.
//!
//! Composition is left-associative. The `type` set is associative; the
//! other keywords follow the evaluation order, the last operand winning.

use std::ops::Add;

use crate::fragment::Schema;

impl Schema {
    /// Widen this fragment to also accept `other`'s value space.
    pub fn union(mut self, other: Schema) -> Schema {
        let Schema {
            types,
            properties,
            required,
            items,
            default,
            extra,
        } = other;

        for t in types {
            self.add_type(t);
        }
        if properties.is_some() {
            self.properties = properties;
        }
        if required.is_some() {
            self.required = required;
        }
        if items.is_some() {
            self.items = items;
        }
        if default.is_some() {
            self.default = default;
        }
        for (name, value) in extra {
            self.extra.insert(name, value);
        }
        self
    }
}

impl Add for Schema {
    type Output = Schema;

    fn add(self, rhs: Schema) -> Schema {
        self.union(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classy_core::JsonType;
    use serde_json::json;

    #[test]
    fn test_schema_add() {
        let actual = Schema::integer() + Schema::string().format("date-time");

        assert_eq!(actual.types(), &[JsonType::Integer, JsonType::String]);
        assert_eq!(
            actual.render().unwrap(),
            json!({"type": ["integer", "string"], "format": "date-time"})
        );
        actual.validate(&json!(2)).unwrap();
        actual.validate(&json!("2021-01-01")).unwrap();
        assert!(actual.validate(&json!(true)).is_err());
    }

    #[test]
    fn test_schema_add_multiple_types() {
        let actual = (Schema::integer() + Schema::string().format("date-time"))
            + Schema::string().format("email");

        assert_eq!(actual.types(), &[JsonType::Integer, JsonType::String]);
        assert_eq!(actual.keywords()["format"], "email");
        actual.validate(&json!(2)).unwrap();
        actual.validate(&json!("hello@example.com")).unwrap();
    }

    #[test]
    fn test_schema_add_array() {
        let actual = Schema::integer()
            + Schema::string().format("date-time")
            + Schema::array().items(Schema::number());

        assert_eq!(
            actual.render().unwrap(),
            json!({
                "type": ["integer", "string", "array"],
                "items": {"type": "number"},
                "format": "date-time",
            })
        );
        actual.validate(&json!(2)).unwrap();
        actual.validate(&json!("2021-01-01")).unwrap();
        actual.validate(&json!([1, 2, 3])).unwrap();
        assert!(actual.validate(&json!(["a"])).is_err());
    }

    #[test]
    fn test_union_last_operand_wins_for_keywords() {
        let a = Schema::string().keyword("maxLength", json!(5)).default(json!("a"));
        let b = Schema::string().keyword("maxLength", json!(10));
        let c = a.clone() + b.clone();
        assert_eq!(c.keywords()["maxLength"], 10);
        assert_eq!(c.render().unwrap()["default"], "a");

        let d = b + a;
        assert_eq!(d.keywords()["maxLength"], 5);
    }

    #[test]
    fn test_union_keeps_left_properties_when_right_has_none() {
        let obj = Schema::object().property("k", Schema::string());
        let merged = obj + Schema::null();
        assert!(merged.properties().unwrap().contains_key("k"));
        merged.validate(&json!(null)).unwrap();
        merged.validate(&json!({"k": "v"})).unwrap();
    }

    #[test]
    fn test_union_duplicate_type_not_repeated() {
        let merged = Schema::string() + Schema::string() + Schema::null();
        assert_eq!(merged.types(), &[JsonType::String, JsonType::Null]);
    }
}
