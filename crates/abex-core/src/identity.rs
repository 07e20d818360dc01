//! # Ability Names
//!
//! Every catalog entry is keyed by a `namespace/slug` string such as
//! `ability-explorer/get-site-health`. [`AbilityName`] is the validated
//! newtype for that key so that lookups, provider detection, and routing
//! never operate on unchecked strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NameError;

/// Validated `namespace/slug` ability key.
///
/// Both segments are non-empty and consist of lowercase ASCII letters,
/// digits, and `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AbilityName {
    full: String,
    separator: usize,
}

impl AbilityName {
    /// Parse and validate an ability name.
    pub fn new(name: impl Into<String>) -> Result<Self, NameError> {
        let full = name.into().trim().to_string();
        if full.is_empty() {
            return Err(NameError::Empty);
        }

        let mut parts = full.splitn(3, '/');
        let (namespace, slug) = match (parts.next(), parts.next(), parts.next()) {
            (Some(ns), Some(slug), None) => (ns, slug),
            _ => return Err(NameError::MissingSeparator(full.clone())),
        };

        check_segment("namespace", namespace)?;
        check_segment("slug", slug)?;

        let separator = namespace.len();
        Ok(Self { full, separator })
    }

    /// The part before the `/`.
    pub fn namespace(&self) -> &str {
        &self.full[..self.separator]
    }

    /// The part after the `/`.
    pub fn slug(&self) -> &str {
        &self.full[self.separator + 1..]
    }

    /// The full `namespace/slug` string.
    pub fn as_str(&self) -> &str {
        &self.full
    }
}

fn check_segment(segment: &'static str, value: &str) -> Result<(), NameError> {
    if value.is_empty() {
        return Err(NameError::InvalidSegment {
            segment,
            value: value.to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
    {
        return Err(NameError::InvalidSegment {
            segment,
            value: value.to_string(),
            reason: format!("character '{bad}' is not allowed (use a-z, 0-9, -)"),
        });
    }
    Ok(())
}

impl fmt::Display for AbilityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

impl FromStr for AbilityName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AbilityName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AbilityName> for String {
    fn from(name: AbilityName) -> Self {
        name.full
    }
}

impl AsRef<str> for AbilityName {
    fn as_ref(&self) -> &str {
        &self.full
    }
}
