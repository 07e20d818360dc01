//! # abex-schema — Schema Validation & Example Engine
//!
//! Checks and previews structured input before an ability is invoked.
//! Two pure functions carry the whole contract:
//!
//! - [`validate`] — checks a candidate input against a schema's `required`
//!   list and per-property `type` tags, returning a [`ValidationResult`] of
//!   human-readable messages.
//! - [`generate_example`] — builds a plausible input from a schema's
//!   `default`/`example` values and type placeholders, used to pre-populate
//!   a test form.
//!
//! Schemas are a small subset of JSON Schema (`type`, `properties`,
//! `required`, `default`, `example`, `description`) read leniently from a
//! [`serde_json::Value`]. A malformed schema never fails; it degrades to
//! "no constraint of that kind".
//!
//! ## Crate Policy
//!
//! - No I/O, no shared state: every call allocates its own result.
//! - Error messages are part of the contract and are matched by callers and
//!   tests verbatim.

pub mod example;
pub mod schema;
pub mod validate;

pub use example::{generate_example, generate_example_with, ExampleOptions};
pub use schema::{FieldSummary, Schema, SchemaType};
pub use validate::{is_numeric_str, type_matches, validate, validate_schema, ValidationResult};
