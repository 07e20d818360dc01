//! # Demo Abilities
//!
//! Built-in abilities that show what a catalog entry looks like. Each demo
//! is switched on and off through a named option in the injected
//! [`SettingsStore`]; the [`DemoManager`] keeps the registry in step with
//! the stored flags.
//!
//! The manager only ever removes the instance it registered itself. If
//! another ability already holds a demo's name, enabling that demo fails
//! with [`DemoError::SlugTaken`] and the stored flag is left unchanged.

pub mod site_health;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use thiserror::Error;

use abex_core::NameError;

use crate::ability::Invocable;
use crate::registry::{AbilityRegistry, RegistryError};
use crate::settings::SettingsStore;

use self::site_health::{default_checks, HealthCheck, SiteHealthAbility};

/// Which built-in ability a demo installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoKind {
    SiteHealth,
}

/// Static description of one demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoDescriptor {
    /// Key used in toggle requests.
    pub key: &'static str,
    pub name: &'static str,
    /// Ability name registered when enabled.
    pub slug: &'static str,
    pub description: &'static str,
    /// Settings option holding the enabled flag.
    pub option: &'static str,
    pub read_only: bool,
    pub kind: DemoKind,
}

/// Every demo the manager knows about.
pub const DEMO_ABILITIES: &[DemoDescriptor] = &[DemoDescriptor {
    key: "site-health",
    name: "Get Site Health Status",
    slug: "ability-explorer/get-site-health",
    description: "Returns site health status from a set of built-in diagnostic checks. \
        Shows overall score, number of passed/failed tests, and critical issues.",
    option: "ability_explorer_demo_site_health",
    read_only: true,
    kind: DemoKind::SiteHealth,
}];

/// Look up a demo by key.
pub fn find_demo(key: &str) -> Option<&'static DemoDescriptor> {
    DEMO_ABILITIES.iter().find(|d| d.key == key)
}

/// A demo with its current enabled flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemoStatus {
    pub key: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub read_only: bool,
    pub enabled: bool,
}

/// Result of a toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleOutcome {
    pub enabled: bool,
    pub message: String,
}

/// Errors from demo management.
#[derive(Error, Debug)]
pub enum DemoError {
    #[error("Invalid ability.")]
    MissingKey,

    #[error("Unknown ability.")]
    Unknown(String),

    /// Another ability is registered under the demo's name.
    #[error("Another ability is already registered as \"{0}\".")]
    SlugTaken(String),

    #[error("invalid demo ability name: {0}")]
    Name(#[from] NameError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Keeps demo abilities registered according to their stored flags.
///
/// Clones share state. Flag changes are serialized by an internal lock
/// that is held across reading the flag, storing it and syncing the
/// registry.
#[derive(Clone)]
pub struct DemoManager {
    registry: AbilityRegistry,
    settings: Arc<dyn SettingsStore>,
    checks: Arc<Vec<Arc<dyn HealthCheck>>>,
    /// Instances this manager registered, keyed by demo key.
    installed: Arc<Mutex<HashMap<&'static str, Arc<dyn Invocable>>>>,
}

impl std::fmt::Debug for DemoManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DemoManager")
            .field("registry", &self.registry)
            .field("checks", &self.checks.len())
            .finish()
    }
}

impl DemoManager {
    /// Manager using the default health checks.
    pub fn new(registry: AbilityRegistry, settings: Arc<dyn SettingsStore>) -> Self {
        Self::with_checks(registry, settings, default_checks())
    }

    /// Manager whose site-health demo runs `checks`.
    pub fn with_checks(
        registry: AbilityRegistry,
        settings: Arc<dyn SettingsStore>,
        checks: Vec<Arc<dyn HealthCheck>>,
    ) -> Self {
        Self {
            registry,
            settings,
            checks: Arc::new(checks),
            installed: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Every demo with its enabled flag.
    pub fn list(&self) -> Vec<DemoStatus> {
        DEMO_ABILITIES
            .iter()
            .map(|d| DemoStatus {
                key: d.key.to_string(),
                name: d.name.to_string(),
                slug: d.slug.to_string(),
                description: d.description.to_string(),
                read_only: d.read_only,
                enabled: self.settings.is_enabled(d.option),
            })
            .collect()
    }

    /// Flip the demo named `key` and (un)register its ability.
    pub fn toggle(&self, key: &str) -> Result<ToggleOutcome, DemoError> {
        self.update(key, |current| !current)
    }

    /// Store `enabled` for the demo named `key` and (un)register its
    /// ability. Setting the current value again is a no-op that succeeds.
    pub fn set_enabled(&self, key: &str, enabled: bool) -> Result<ToggleOutcome, DemoError> {
        self.update(key, |_| enabled)
    }

    /// Register every demo whose option is set. Called once at startup.
    pub fn apply(&self) -> Result<(), DemoError> {
        let mut installed = self.installed.lock();
        for demo in DEMO_ABILITIES {
            self.sync(&mut installed, demo, self.settings.is_enabled(demo.option))?;
        }
        Ok(())
    }

    fn update(
        &self,
        key: &str,
        next: impl FnOnce(bool) -> bool,
    ) -> Result<ToggleOutcome, DemoError> {
        if key.is_empty() {
            return Err(DemoError::MissingKey);
        }
        let demo = find_demo(key).ok_or_else(|| DemoError::Unknown(key.to_string()))?;

        let mut installed = self.installed.lock();
        let previous = self.settings.is_enabled(demo.option);
        let enabled = next(previous);
        self.settings.set(demo.option, enabled);
        if let Err(err) = self.sync(&mut installed, demo, enabled) {
            self.settings.set(demo.option, previous);
            tracing::warn!(demo = %demo.key, error = %err, "demo update rolled back");
            return Err(err);
        }
        tracing::info!(demo = %demo.key, enabled, "updated demo ability");

        let message = if enabled {
            "Ability enabled. Check the Explorer to see it."
        } else {
            "Ability disabled."
        };
        Ok(ToggleOutcome {
            enabled,
            message: message.to_string(),
        })
    }

    fn sync(
        &self,
        installed: &mut HashMap<&'static str, Arc<dyn Invocable>>,
        demo: &'static DemoDescriptor,
        enabled: bool,
    ) -> Result<(), DemoError> {
        if !enabled {
            if let Some(ability) = installed.remove(demo.key) {
                self.registry.unregister_instance(&ability);
            }
            return Ok(());
        }

        if let Some(ability) = installed.get(demo.key) {
            if self.registry.list().iter().any(|a| Arc::ptr_eq(a, ability)) {
                return Ok(());
            }
            installed.remove(demo.key);
        }
        if self.registry.contains(demo.slug) {
            return Err(DemoError::SlugTaken(demo.slug.to_string()));
        }
        let ability = self.build(demo)?;
        self.registry.register(ability.clone())?;
        installed.insert(demo.key, ability);
        Ok(())
    }

    fn build(&self, demo: &DemoDescriptor) -> Result<Arc<dyn Invocable>, DemoError> {
        match demo.kind {
            DemoKind::SiteHealth => Ok(Arc::new(SiteHealthAbility::new(
                demo.slug,
                self.checks.as_ref().clone(),
            )?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::tests::Stub;
    use crate::settings::InMemorySettings;

    const KEY: &str = "site-health";
    const SLUG: &str = "ability-explorer/get-site-health";
    const OPTION: &str = "ability_explorer_demo_site_health";

    fn manager(settings: InMemorySettings) -> (DemoManager, AbilityRegistry) {
        let registry = AbilityRegistry::default();
        let manager = DemoManager::with_checks(registry.clone(), Arc::new(settings), Vec::new());
        (manager, registry)
    }

    #[test]
    fn toggle_flips_setting_and_registration() {
        let settings = InMemorySettings::new();
        let (demos, registry) = manager(settings.clone());

        let on = demos.toggle(KEY).unwrap();
        assert!(on.enabled);
        assert_eq!(on.message, "Ability enabled. Check the Explorer to see it.");
        assert_eq!(settings.get(OPTION), Some(true));
        assert!(registry.contains(SLUG));

        let off = demos.toggle(KEY).unwrap();
        assert!(!off.enabled);
        assert_eq!(off.message, "Ability disabled.");
        assert_eq!(settings.get(OPTION), Some(false));
        assert!(!registry.contains(SLUG));
    }

    #[test]
    fn unknown_and_empty_keys_are_rejected() {
        let (demos, _) = manager(InMemorySettings::new());
        assert!(matches!(demos.toggle(""), Err(DemoError::MissingKey)));
        let err = demos.toggle("weather").unwrap_err();
        assert!(matches!(err, DemoError::Unknown(ref k) if k == "weather"));
        assert_eq!(err.to_string(), "Unknown ability.");
    }

    #[test]
    fn apply_registers_enabled_demos() {
        let (demos, registry) = manager(InMemorySettings::with_values([(OPTION, true)]));
        assert!(!registry.contains(SLUG));
        demos.apply().unwrap();
        assert!(registry.contains(SLUG));
        demos.apply().unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn apply_leaves_disabled_demos_unregistered() {
        let (demos, registry) = manager(InMemorySettings::new());
        demos.apply().unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn set_enabled_is_idempotent() {
        let settings = InMemorySettings::new();
        let (demos, registry) = manager(settings.clone());

        assert!(demos.set_enabled(KEY, true).unwrap().enabled);
        assert!(demos.set_enabled(KEY, true).unwrap().enabled);
        assert_eq!(settings.get(OPTION), Some(true));
        assert_eq!(registry.len(), 1);

        assert!(!demos.set_enabled(KEY, false).unwrap().enabled);
        assert!(!demos.set_enabled(KEY, false).unwrap().enabled);
        assert!(registry.is_empty());
    }

    fn foreign_site_health(registry: &AbilityRegistry) -> Arc<dyn Invocable> {
        let ability: Arc<dyn Invocable> = Arc::new(Stub::new(SLUG, "Mine"));
        registry.register(ability.clone()).unwrap();
        ability
    }

    #[test]
    fn apply_keeps_same_named_ability_it_does_not_own() {
        let (demos, registry) = manager(InMemorySettings::new());
        foreign_site_health(&registry);
        demos.apply().unwrap();
        assert_eq!(registry.get(SLUG).unwrap().label(), "Mine");
    }

    #[test]
    fn enabling_over_a_same_named_ability_fails_and_rolls_back() {
        let settings = InMemorySettings::new();
        let (demos, registry) = manager(settings.clone());
        foreign_site_health(&registry);

        let err = demos.toggle(KEY).unwrap_err();
        assert!(matches!(err, DemoError::SlugTaken(ref s) if s == SLUG));
        assert_eq!(settings.get(OPTION), Some(false));
        assert!(!demos.list()[0].enabled);

        demos.set_enabled(KEY, false).unwrap();
        assert_eq!(registry.get(SLUG).unwrap().label(), "Mine");
    }

    #[test]
    fn disabling_removes_only_the_managed_instance() {
        let (demos, registry) = manager(InMemorySettings::new());
        demos.toggle(KEY).unwrap();
        let managed = registry.get(SLUG).unwrap();
        registry.unregister(managed.name());
        foreign_site_health(&registry);

        demos.toggle(KEY).unwrap();
        assert_eq!(registry.get(SLUG).unwrap().label(), "Mine");
    }

    #[test]
    fn concurrent_toggles_never_lose_a_flip() {
        let settings = InMemorySettings::new();
        let (demos, registry) = manager(settings.clone());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let demos = demos.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        demos.toggle(KEY).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(settings.get(OPTION), Some(false));
        assert!(registry.is_empty());
    }

    #[test]
    fn list_reports_enabled_flag() {
        let settings = InMemorySettings::new();
        let (demos, _) = manager(settings.clone());
        let listed = demos.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].slug, SLUG);
        assert!(listed[0].read_only);
        assert!(!listed[0].enabled);

        settings.set(OPTION, true);
        assert!(demos.list()[0].enabled);
    }
}
