//! # Example Input Generation
//!
//! Builds a plausible input for a schema so a test form can be
//! pre-populated.
//!
//! Each property resolves, in priority order, to its explicit `default`,
//! its explicit `example`, or a placeholder for its `type`
//! (`""`, `0`, `false`, `[]`, `{}`, or `null` for unknown/missing tags).
//! Only the root's direct properties are expanded; nested `object` and
//! `array` properties become `{}` and `[]`. Set
//! [`ExampleOptions::expand_nested`] to recurse into nested object
//! properties instead.

use serde_json::{Map, Value};

use crate::schema::{Schema, SchemaType};

/// Knobs for [`generate_example_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExampleOptions {
    /// Expand `object` properties that declare their own `properties`
    /// instead of emitting `{}`.
    pub expand_nested: bool,
}

/// Generate an example input for a raw schema value with default options.
///
/// Returns `{}` for an empty schema or a schema without `properties`.
pub fn generate_example(schema: &Value) -> Value {
    generate_example_with(&Schema::from_value(schema), ExampleOptions::default())
}

/// Generate an example input for a parsed schema.
pub fn generate_example_with(schema: &Schema, options: ExampleOptions) -> Value {
    Value::Object(expand_properties(schema, options))
}

fn expand_properties(schema: &Schema, options: ExampleOptions) -> Map<String, Value> {
    schema
        .properties
        .iter()
        .map(|(name, prop)| (name.clone(), example_value(prop, options)))
        .collect()
}

fn example_value(schema: &Schema, options: ExampleOptions) -> Value {
    if let Some(default) = &schema.default {
        return default.clone();
    }
    if let Some(example) = &schema.example {
        return example.clone();
    }
    match &schema.schema_type {
        Some(SchemaType::String) => Value::String(String::new()),
        Some(SchemaType::Number | SchemaType::Integer) => Value::from(0),
        Some(SchemaType::Boolean) => Value::Bool(false),
        Some(SchemaType::Array) => Value::Array(Vec::new()),
        Some(SchemaType::Object) if options.expand_nested => {
            Value::Object(expand_properties(schema, options))
        }
        Some(SchemaType::Object) => Value::Object(Map::new()),
        Some(SchemaType::Other(_)) | None => Value::Null,
    }
}
