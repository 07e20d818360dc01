//! # Ability Contract
//!
//! An ability is a named operation with declared input and output schemas,
//! selected at runtime from an open-ended catalog. The catalog stores
//! abilities as `Arc<dyn Invocable>` so hosts can register any type.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use abex_core::AbilityName;

static NO_META: Value = Value::Null;

/// A catalog entry that can describe and execute itself.
pub trait Invocable: Send + Sync {
    /// The `namespace/slug` key.
    fn name(&self) -> &AbilityName;

    /// Human label.
    fn label(&self) -> &str;

    /// Free-text description.
    fn description(&self) -> &str;

    /// Schema of the accepted input. `null` or `{}` means "takes no input".
    fn input_schema(&self) -> &Value;

    /// Schema of the returned data. Informational only.
    fn output_schema(&self) -> &Value;

    /// Arbitrary registration metadata (e.g. an explicit `provider`).
    fn meta(&self) -> &Value {
        &NO_META
    }

    /// Run the ability. `None` is passed when the ability declares no
    /// input schema.
    fn execute(&self, input: Option<Value>) -> Result<Value, AbilityFailure>;
}

/// Structured failure returned by an ability.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("{message}")]
pub struct AbilityFailure {
    /// Machine-readable code (e.g. `invalid_argument`).
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Optional auxiliary data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl AbilityFailure {
    /// Failure with a code and message and no auxiliary data.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            data: None,
        }
    }

    /// Attach auxiliary data.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}
