//! # Invocation Pipeline
//!
//! Validate-then-execute path shared by every caller (HTTP transport, CLI,
//! tests):
//!
//! 1. reject an empty ability name;
//! 2. resolve the ability in the registry;
//! 3. validate the input against a non-empty input schema;
//! 4. execute, passing `None` to abilities that declare no input schema.
//!
//! Validation failures never reach the ability. [`check_input`] stops after
//! step 3 so a form can be checked before it is submitted.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use abex_schema::{validate_schema, Schema, ValidationResult};

use crate::ability::{AbilityFailure, Invocable};
use crate::registry::AbilityRegistry;

/// Why an invocation did not produce data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvokeError {
    #[error("Ability slug is required.")]
    MissingSlug,

    #[error("Ability not found.")]
    NotFound(String),

    /// Input did not satisfy the ability's input schema.
    #[error("Input validation failed.")]
    Validation { errors: Vec<String> },

    /// The ability ran and reported a failure.
    #[error("{0}")]
    Failed(AbilityFailure),
}

impl InvokeError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &str {
        match self {
            Self::MissingSlug => "missing_slug",
            Self::NotFound(_) => "not_found",
            Self::Validation { .. } => "validation_failed",
            Self::Failed(failure) => &failure.code,
        }
    }
}

/// Record of a successful invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invocation {
    pub id: Uuid,
    /// The `namespace/slug` that ran.
    pub ability: String,
    /// What the ability returned.
    pub data: Value,
    pub invoked_at: DateTime<Utc>,
}

/// Validate `input` for the ability named `slug` without executing it.
pub fn check_input(
    registry: &AbilityRegistry,
    slug: &str,
    input: &Value,
) -> Result<ValidationResult, InvokeError> {
    let ability = resolve(registry, slug)?;
    let schema = Schema::from_value(ability.input_schema());
    if schema.is_empty() {
        return Ok(ValidationResult::ok());
    }
    Ok(validate_schema(&schema, input))
}

/// Validate `input` and execute the ability named `slug`.
pub fn invoke(
    registry: &AbilityRegistry,
    slug: &str,
    input: Value,
) -> Result<Invocation, InvokeError> {
    let ability = resolve(registry, slug)?;
    let schema = Schema::from_value(ability.input_schema());

    let argument = if schema.is_empty() {
        None
    } else {
        let result = validate_schema(&schema, &input);
        if !result.valid {
            tracing::info!(
                ability = %slug,
                errors = result.errors.len(),
                "invocation rejected by input validation"
            );
            return Err(InvokeError::Validation {
                errors: result.errors,
            });
        }
        Some(input)
    };

    let started = Instant::now();
    let outcome = ability.execute(argument);
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match outcome {
        Ok(data) => {
            let invocation = Invocation {
                id: Uuid::new_v4(),
                ability: slug.to_string(),
                data,
                invoked_at: Utc::now(),
            };
            tracing::info!(
                ability = %slug,
                invocation_id = %invocation.id,
                elapsed_ms,
                "ability executed"
            );
            Ok(invocation)
        }
        Err(failure) => {
            tracing::warn!(
                ability = %slug,
                code = %failure.code,
                elapsed_ms,
                "ability reported failure: {}",
                failure.message
            );
            Err(InvokeError::Failed(failure))
        }
    }
}

fn resolve(
    registry: &AbilityRegistry,
    slug: &str,
) -> Result<std::sync::Arc<dyn Invocable>, InvokeError> {
    if slug.is_empty() {
        return Err(InvokeError::MissingSlug);
    }
    registry
        .get(slug)
        .ok_or_else(|| InvokeError::NotFound(slug.to_string()))
}
