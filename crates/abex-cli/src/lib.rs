//! # abex-cli — CLI Tool for Ability Explorer
//!
//! Provides the `abex` command-line interface over a catalog file.
//!
//! ## Subcommands
//!
//! - `abex list` — search, filter, sort and paginate abilities.
//! - `abex show` — one ability with its input fields and example input.
//! - `abex stats` — ability counts per provider.
//! - `abex example` — print the generated example input.
//! - `abex validate` — check input without executing.
//! - `abex invoke` — validate and execute.
//! - `abex demos` — list the built-in demo abilities.
//!
//! ```bash
//! abex --catalog abilities.yaml list --provider Core
//! abex --catalog abilities.yaml invoke acme/greet --input '{"name": "Ann"}'
//! abex --enable-demo site-health invoke ability-explorer/get-site-health
//! ```

pub mod browse;
pub mod run;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use abex_core::ProviderContext;
use abex_registry::{AbilityRegistry, DemoManager, InMemorySettings};

/// Registry and demo manager for one CLI run.
#[derive(Debug, Clone)]
pub struct Session {
    pub registry: AbilityRegistry,
    pub demos: DemoManager,
}

impl Session {
    /// Build a session: load `catalog` (if any), classify `themes` as
    /// theme namespaces, and switch on the demos named in `enabled_demos`.
    pub fn load(
        catalog: Option<&Path>,
        themes: &[String],
        enabled_demos: &[String],
    ) -> Result<Self> {
        let registry = AbilityRegistry::new(ProviderContext::with_themes(themes.iter().cloned()));
        if let Some(path) = catalog {
            let count = registry
                .load_file(path)
                .with_context(|| format!("failed to load catalog {}", path.display()))?;
            tracing::info!(path = %path.display(), count, "loaded ability catalog");
        }

        let demos = DemoManager::new(registry.clone(), Arc::new(InMemorySettings::new()));
        for key in enabled_demos {
            demos
                .set_enabled(key, true)
                .with_context(|| format!("cannot enable demo \"{key}\""))?;
            tracing::debug!(demo = %key, "demo enabled");
        }

        Ok(Self { registry, demos })
    }
}

/// Read ability input from an inline JSON string or a file.
///
/// Neither given, or blank text, yields `{}`.
pub fn read_input(inline: Option<&str>, file: Option<&Path>) -> Result<Value> {
    let text = match (inline, file) {
        (Some(text), _) => text.to_string(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display()))?,
        (None, None) => String::new(),
    };
    if text.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_str(&text).context("input is not valid JSON")
}
