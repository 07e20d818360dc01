//! # Schema Validation
//!
//! Checks a candidate input against a schema's `required` list and the
//! `type` tags of its direct properties.
//!
//! ## Contract
//!
//! 1. An empty schema means "no constraints" and always validates.
//! 2. Each name in `required` (declaration order) that is not a key of the
//!    input yields `Required field "<name>" is missing`. Presence is by key,
//!    not truthiness: `false`, `0`, `""` and `null` all satisfy it.
//! 3. Each property (declaration order) that is present in the input and
//!    declares a `type` is checked with [`type_matches`]; a mismatch yields
//!    `Field "<name>" should be of type "<type>"`.
//!
//! Validation never fails or panics. A non-mapping input simply lacks
//! every key.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::{Schema, SchemaType};

/// Outcome of one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True iff `errors` is empty.
    pub valid: bool,
    /// Human-readable messages, in check order.
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// A passing result with no messages.
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Validate `input` against a raw schema value.
pub fn validate(schema: &Value, input: &Value) -> ValidationResult {
    validate_schema(&Schema::from_value(schema), input)
}

/// Validate `input` against an already parsed schema.
pub fn validate_schema(schema: &Schema, input: &Value) -> ValidationResult {
    if schema.is_empty() {
        return ValidationResult::ok();
    }

    let fields = input.as_object();
    let mut errors = Vec::new();

    for name in &schema.required {
        let present = fields.map_or(false, |map| map.contains_key(name));
        if !present {
            errors.push(format!("Required field \"{name}\" is missing"));
        }
    }

    if let Some(fields) = fields {
        for (name, prop) in &schema.properties {
            let (Some(value), Some(expected)) = (fields.get(name), prop.schema_type.as_ref())
            else {
                continue;
            };
            if !type_matches(expected, value) {
                errors.push(format!(
                    "Field \"{name}\" should be of type \"{expected}\""
                ));
            }
        }
    }

    ValidationResult::from_errors(errors)
}

/// Whether `value` is acceptable for a declared type tag.
///
/// Numbers accept numeric strings, matching the loose typing of form input.
/// Arrays and objects are disjoint: a sequence is never an object. Unknown
/// tags accept everything.
pub fn type_matches(expected: &SchemaType, value: &Value) -> bool {
    match expected {
        SchemaType::String => value.is_string(),
        SchemaType::Number | SchemaType::Integer => match value {
            Value::Number(_) => true,
            Value::String(s) => is_numeric_str(s),
            _ => false,
        },
        SchemaType::Boolean => value.is_boolean(),
        SchemaType::Array => value.is_array(),
        SchemaType::Object => value.is_object(),
        SchemaType::Other(_) => true,
    }
}

/// Whether a string reads as a decimal number.
///
/// Accepts optional surrounding whitespace, an optional sign, digits with an
/// optional fraction (`5`, `5.`, `.5`, `5.25`) and an optional exponent
/// (`1e3`, `2.5E-4`). Hex, `inf`, `nan`, and digit separators are rejected.
pub fn is_numeric_str(s: &str) -> bool {
    let bytes = s.trim_matches(is_numeric_whitespace).as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i - int_start;

    let mut frac_digits = 0;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        frac_digits = i - frac_start;
    }

    if int_digits == 0 && frac_digits == 0 {
        return false;
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}

fn is_numeric_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person_schema() -> Value {
        json!({
            "required": ["name"],
            "properties": {
                "name": {"type": "string"},
                "age": {"type": "integer"}
            }
        })
    }

    #[test]
    fn empty_schema_accepts_anything() {
        for input in [json!(null), json!(42), json!({"x": 1}), json!([1, 2])] {
            assert_eq!(validate(&json!({}), &input), ValidationResult::ok());
            assert_eq!(validate(&Value::Null, &input), ValidationResult::ok());
        }
    }

    #[test]
    fn missing_required_field_with_numeric_string_age() {
        let result = validate(&person_schema(), &json!({"age": "30"}));
        assert!(!result.valid);
        assert_eq!(result.errors, ["Required field \"name\" is missing"]);
    }

    #[test]
    fn non_numeric_string_for_integer() {
        let result = validate(&person_schema(), &json!({"name": "Ann", "age": "thirty"}));
        assert!(!result.valid);
        assert_eq!(result.errors, ["Field \"age\" should be of type \"integer\""]);
    }

    #[test]
    fn falsy_but_present_values_satisfy_required() {
        let schema = json!({"required": ["flag", "count", "label", "nothing"]});
        let input = json!({"flag": false, "count": 0, "label": "", "nothing": null});
        assert_eq!(validate(&schema, &input), ValidationResult::ok());
    }

    #[test]
    fn required_errors_precede_type_errors() {
        let schema = json!({
            "required": ["b", "a"],
            "properties": {
                "y": {"type": "boolean"},
                "x": {"type": "string"}
            }
        });
        let result = validate(&schema, &json!({"x": 1, "y": "no"}));
        assert_eq!(
            result.errors,
            [
                "Required field \"b\" is missing",
                "Required field \"a\" is missing",
                "Field \"y\" should be of type \"boolean\"",
                "Field \"x\" should be of type \"string\"",
            ]
        );
    }

    #[test]
    fn non_mapping_input_misses_every_required_key() {
        let schema = person_schema();
        for input in [json!(null), json!("name"), json!(["name"])] {
            let result = validate(&schema, &input);
            assert_eq!(result.errors, ["Required field \"name\" is missing"]);
        }
    }

    #[test]
    fn absent_properties_are_not_type_checked() {
        let schema = json!({"properties": {"age": {"type": "integer"}}});
        assert_eq!(validate(&schema, &json!({})), ValidationResult::ok());
    }

    #[test]
    fn properties_without_type_accept_anything() {
        let schema = json!({"properties": {"blob": {"description": "anything"}}});
        assert!(validate(&schema, &json!({"blob": [1, {"a": 2}]})).valid);
    }

    #[test]
    fn unknown_type_tag_is_permissive() {
        let schema = json!({"properties": {"when": {"type": "date-time"}}});
        assert!(validate(&schema, &json!({"when": 17})).valid);
    }

    #[test]
    fn type_table() {
        let cases: &[(&str, Value, bool)] = &[
            ("string", json!("x"), true),
            ("string", json!(1), false),
            ("number", json!(1.5), true),
            ("number", json!("1.5"), true),
            ("number", json!(true), false),
            ("integer", json!(3), true),
            ("integer", json!(" 3 "), true),
            ("integer", json!(null), false),
            ("boolean", json!(false), true),
            ("boolean", json!("false"), false),
            ("boolean", json!(0), false),
            ("array", json!([]), true),
            ("array", json!({}), false),
            ("object", json!({}), true),
            ("object", json!([]), false),
            ("object", json!("{}"), false),
        ];
        for (tag, value, expected) in cases {
            assert_eq!(
                type_matches(&SchemaType::parse(tag), value),
                *expected,
                "type {tag} vs {value}"
            );
        }
    }

    #[test]
    fn null_value_fails_typed_property() {
        let schema = json!({"properties": {"name": {"type": "string"}}});
        let result = validate(&schema, &json!({"name": null}));
        assert_eq!(result.errors, ["Field \"name\" should be of type \"string\""]);
    }

    #[test]
    fn numeric_strings() {
        for ok in ["0", "-12", "+7", "3.14", ".5", "5.", "1e3", "2.5E-4", "  42", "42\n"] {
            assert!(is_numeric_str(ok), "{ok:?} should be numeric");
        }
        for bad in [
            "", " ", "-", ".", "e5", "1e", "1e+", "0x1A", "1_000", "abc", "12abc", "inf", "NaN",
            "1 2",
        ] {
            assert!(!is_numeric_str(bad), "{bad:?} should not be numeric");
        }
    }

    #[test]
    fn result_serializes_with_valid_and_errors() {
        let result = validate(&person_schema(), &json!({}));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({"valid": false, "errors": ["Required field \"name\" is missing"]})
        );
    }
}
