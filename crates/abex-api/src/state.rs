//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers via
//! the `State` extractor. Every field is a clonable handle; clones share the
//! same registry and settings.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use abex_core::ProviderContext;
use abex_registry::demo::find_demo;
use abex_registry::{
    AbilityRegistry, CatalogFileError, DemoError, DemoManager, InMemorySettings, SettingsStore,
};

/// Runtime configuration, read from the environment by the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Namespaces classified as themes (`ABEX_ACTIVE_THEMES`, comma list).
    pub active_themes: Vec<String>,
    /// Initial flag of the site-health demo (`ABEX_DEMO_SITE_HEALTH`).
    pub demo_site_health: bool,
    /// Catalog file registered at startup (`ABEX_CATALOG`).
    pub catalog: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            active_themes: Vec::new(),
            demo_site_health: false,
            catalog: None,
        }
    }
}

impl AppConfig {
    /// Read configuration through `lookup`, falling back to defaults for
    /// missing or unparsable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            port: lookup("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(defaults.port),
            active_themes: lookup("ABEX_ACTIVE_THEMES")
                .map(|themes| {
                    themes
                        .split(',')
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            demo_site_health: lookup("ABEX_DEMO_SITE_HEALTH")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.demo_site_health),
            catalog: lookup("ABEX_CATALOG")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    /// Read configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Failure assembling the application state.
#[derive(Error, Debug)]
pub enum StateError {
    #[error(transparent)]
    Catalog(#[from] CatalogFileError),

    #[error(transparent)]
    Demo(#[from] DemoError),
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: AbilityRegistry,
    pub settings: InMemorySettings,
    pub demos: DemoManager,
    pub config: AppConfig,
}

impl AppState {
    /// Build state for `config`: load the catalog file, seed demo flags and
    /// register enabled demos.
    pub fn try_with_config(config: AppConfig) -> Result<Self, StateError> {
        let registry =
            AbilityRegistry::new(ProviderContext::with_themes(config.active_themes.clone()));
        if let Some(path) = &config.catalog {
            let count = registry.load_file(path)?;
            tracing::info!(path = %path.display(), count, "loaded ability catalog");
        }
        let settings = InMemorySettings::new();
        if let Some(demo) = find_demo("site-health") {
            settings.set(demo.option, config.demo_site_health);
        }
        Self::from_parts(registry, settings, config)
    }

    /// Build state around an existing registry and settings store.
    pub fn from_parts(
        registry: AbilityRegistry,
        settings: InMemorySettings,
        config: AppConfig,
    ) -> Result<Self, StateError> {
        let demos = DemoManager::new(registry.clone(), Arc::new(settings.clone()));
        demos.apply()?;
        Ok(Self {
            registry,
            settings,
            demos,
            config,
        })
    }
}
