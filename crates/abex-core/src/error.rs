//! # Error Types
//!
//! Errors raised while constructing core identifiers. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.

use thiserror::Error;

/// Rejection reason for a string that is not a valid ability name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// The name was empty or whitespace only.
    #[error("ability name must not be empty")]
    Empty,

    /// The name does not contain exactly one `/` separator.
    #[error("ability name '{0}' must have the form namespace/slug")]
    MissingSeparator(String),

    /// One of the two segments is empty or contains disallowed characters.
    #[error("invalid {segment} segment '{value}': {reason}")]
    InvalidSegment {
        /// Which segment failed ("namespace" or "slug").
        segment: &'static str,
        /// The offending segment text.
        value: String,
        /// Why the segment was rejected.
        reason: String,
    },
}
