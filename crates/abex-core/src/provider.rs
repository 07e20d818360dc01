//! # Provider Classification
//!
//! Classifies which party registered an ability. The classification is
//! metadata only: it drives listing filters and statistics but never the
//! validation engine.
//!
//! Detection order:
//!
//! 1. An explicit `provider` string in the ability's metadata wins.
//! 2. Namespaces reserved for the host platform (`wordpress`, `wp`, `core`)
//!    are `Core`.
//! 3. A namespace equal to one of the active theme slugs is `Theme`.
//! 4. Everything else is `Plugin`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identity::AbilityName;

/// Namespaces reserved for abilities shipped by the host platform.
pub const CORE_NAMESPACES: [&str; 3] = ["wordpress", "wp", "core"];

/// Which party registered an ability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Provider {
    /// Shipped by the host platform.
    Core,
    /// Registered by a third-party extension.
    Plugin,
    /// Registered by the active theme.
    Theme,
    /// Explicit provider label from metadata that is none of the above.
    Custom(String),
}

impl Provider {
    /// Display label, also used as the filter key in listings.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Core => "Core",
            Self::Plugin => "Plugin",
            Self::Theme => "Theme",
            Self::Custom(label) => label,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Provider {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Core" => Self::Core,
            "Plugin" => Self::Plugin,
            "Theme" => Self::Theme,
            _ => Self::Custom(label),
        }
    }
}

impl From<Provider> for String {
    fn from(provider: Provider) -> Self {
        match provider {
            Provider::Custom(label) => label,
            other => other.as_str().to_string(),
        }
    }
}

/// Host facts needed to classify providers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderContext {
    /// Slugs of the active theme (stylesheet and template may differ).
    pub active_themes: Vec<String>,
}

impl ProviderContext {
    /// Context with the given active theme slugs.
    pub fn with_themes<I, S>(themes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            active_themes: themes.into_iter().map(Into::into).collect(),
        }
    }
}

/// Classify the provider of an ability from its name and metadata.
pub fn detect_provider(name: &AbilityName, meta: &Value, ctx: &ProviderContext) -> Provider {
    if let Some(explicit) = meta.get("provider").and_then(Value::as_str) {
        return Provider::from(explicit.to_string());
    }

    let namespace = name.namespace();
    if CORE_NAMESPACES.contains(&namespace) {
        return Provider::Core;
    }
    if ctx.active_themes.iter().any(|theme| theme == namespace) {
        return Provider::Theme;
    }
    Provider::Plugin
}
