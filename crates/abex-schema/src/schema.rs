//! # Schema Model
//!
//! Lenient, read-only view of a JSON-Schema-lite document.
//!
//! Ability schemas come from an external catalog and are not trusted to be
//! well formed. Parsing therefore never fails: a `required` that is not a
//! list, a `properties` that is not a mapping, or a `type` that is not a
//! string is treated as absent. Property order follows the source document
//! (the workspace enables `serde_json/preserve_order`).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Primitive type tag declared by a schema node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    /// Any other tag. Kept verbatim so it can be echoed in messages.
    Other(String),
}

impl SchemaType {
    /// Map a tag string to its variant.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "string" => Self::String,
            "number" => Self::Number,
            "integer" => Self::Integer,
            "boolean" => Self::Boolean,
            "array" => Self::Array,
            "object" => Self::Object,
            other => Self::Other(other.to_string()),
        }
    }

    /// The tag as written in the schema.
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of a schema tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    /// Whether the source carried any keys at all. An undeclared schema
    /// means "no constraints".
    declared: bool,
    /// Declared `type` tag.
    pub schema_type: Option<SchemaType>,
    /// Child schemas in declaration order.
    pub properties: Vec<(String, Schema)>,
    /// Names listed in `required`, in declaration order.
    pub required: Vec<String>,
    /// Explicit non-null `default`.
    pub default: Option<Value>,
    /// Explicit non-null `example`.
    pub example: Option<Value>,
    /// Free-text `description`, used only for display.
    pub description: Option<String>,
}

impl Schema {
    /// Read a schema node from a JSON value.
    ///
    /// `null`, non-mapping values, and the empty mapping all produce an
    /// undeclared schema.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) if !map.is_empty() => Self::from_map(map),
            _ => Self::default(),
        }
    }

    fn from_map(map: &Map<String, Value>) -> Self {
        let schema_type = map
            .get("type")
            .and_then(Value::as_str)
            .map(SchemaType::parse);

        let properties = map
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .iter()
                    .map(|(name, child)| (name.clone(), Self::from_value(child)))
                    .collect()
            })
            .unwrap_or_default();

        let required = map
            .get("required")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            declared: true,
            schema_type,
            properties,
            required,
            default: non_null(map.get("default")),
            example: non_null(map.get("example")),
            description: map
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }

    /// True when the schema imposes no constraints at all.
    pub fn is_empty(&self) -> bool {
        !self.declared
    }

    /// Look up a direct child schema by property name.
    pub fn property(&self, name: &str) -> Option<&Schema> {
        self.properties
            .iter()
            .find(|(prop, _)| prop == name)
            .map(|(_, schema)| schema)
    }

    /// Whether `name` appears in `required`.
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// Per-property display rows in declaration order.
    pub fn field_summaries(&self) -> Vec<FieldSummary> {
        self.properties
            .iter()
            .map(|(name, schema)| FieldSummary {
                name: name.clone(),
                schema_type: schema.schema_type.as_ref().map(|t| t.to_string()),
                required: self.is_required(name),
                description: schema.description.clone(),
            })
            .collect()
    }
}

fn non_null(value: Option<&Value>) -> Option<Value> {
    value.filter(|v| !v.is_null()).cloned()
}

impl From<&Value> for Schema {
    fn from(value: &Value) -> Self {
        Self::from_value(value)
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// Display row describing one declared property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub schema_type: Option<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
