//! # Ability Registry
//!
//! Clonable handle over the catalog of registered abilities. Entries keep
//! registration order, which is the default listing order before sorting.
//!
//! All operations take the lock briefly and hand out `Arc` clones, so an
//! ability is never executed while the registry lock is held.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use abex_core::{detect_provider, AbilityName, Provider, ProviderContext};

use crate::ability::Invocable;

/// Errors raised when mutating the registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// An ability with the same name is already registered.
    #[error("ability \"{0}\" is already registered")]
    Duplicate(String),
}

/// Thread-safe catalog of abilities.
#[derive(Clone, Default)]
pub struct AbilityRegistry {
    entries: Arc<RwLock<Vec<Arc<dyn Invocable>>>>,
    context: ProviderContext,
}

impl fmt::Debug for AbilityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .entries
            .read()
            .iter()
            .map(|a| a.name().to_string())
            .collect();
        f.debug_struct("AbilityRegistry")
            .field("abilities", &names)
            .field("context", &self.context)
            .finish()
    }
}

impl AbilityRegistry {
    /// Empty registry that classifies providers with `context`.
    pub fn new(context: ProviderContext) -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
            context,
        }
    }

    /// Provider classification context.
    pub fn provider_context(&self) -> &ProviderContext {
        &self.context
    }

    /// Register an ability. Fails if the name is taken.
    pub fn register(&self, ability: Arc<dyn Invocable>) -> Result<(), RegistryError> {
        let mut entries = self.entries.write();
        if entries.iter().any(|a| a.name() == ability.name()) {
            return Err(RegistryError::Duplicate(ability.name().to_string()));
        }
        tracing::debug!(ability = %ability.name(), "registered ability");
        entries.push(ability);
        Ok(())
    }

    /// Remove an ability, returning it if it was registered.
    pub fn unregister(&self, name: &AbilityName) -> Option<Arc<dyn Invocable>> {
        let mut entries = self.entries.write();
        let index = entries.iter().position(|a| a.name() == name)?;
        tracing::debug!(ability = %name, "unregistered ability");
        Some(entries.remove(index))
    }

    /// Remove `ability` only if that exact instance is still registered.
    ///
    /// Another ability registered under the same name is left alone.
    pub fn unregister_instance(&self, ability: &Arc<dyn Invocable>) -> bool {
        let mut entries = self.entries.write();
        let Some(index) = entries.iter().position(|a| Arc::ptr_eq(a, ability)) else {
            return false;
        };
        tracing::debug!(ability = %ability.name(), "unregistered ability");
        entries.remove(index);
        true
    }

    /// Register every ability in `batch`, or none of them.
    ///
    /// Fails without registering anything if a name is already taken or
    /// appears twice in the batch.
    pub fn register_all(&self, batch: Vec<Arc<dyn Invocable>>) -> Result<usize, RegistryError> {
        let mut entries = self.entries.write();
        for (i, ability) in batch.iter().enumerate() {
            let name = ability.name();
            let taken = entries.iter().any(|a| a.name() == name)
                || batch[..i].iter().any(|a| a.name() == name);
            if taken {
                return Err(RegistryError::Duplicate(name.to_string()));
            }
        }
        let count = batch.len();
        for ability in batch {
            tracing::debug!(ability = %ability.name(), "registered ability");
            entries.push(ability);
        }
        Ok(count)
    }

    /// Look up an ability by its `namespace/slug` string.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Invocable>> {
        self.entries
            .read()
            .iter()
            .find(|a| a.name().as_str() == name)
            .cloned()
    }

    /// Whether an ability with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().iter().any(|a| a.name().as_str() == name)
    }

    /// Number of registered abilities.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// All abilities in registration order.
    pub fn list(&self) -> Vec<Arc<dyn Invocable>> {
        self.entries.read().clone()
    }

    /// Display summary of one ability.
    pub fn describe(&self, name: &str) -> Option<AbilitySummary> {
        self.get(name)
            .map(|ability| AbilitySummary::from_ability(ability.as_ref(), &self.context))
    }

    /// Display summaries of every ability in registration order.
    pub fn describe_all(&self) -> Vec<AbilitySummary> {
        self.list()
            .iter()
            .map(|ability| AbilitySummary::from_ability(ability.as_ref(), &self.context))
            .collect()
    }
}

/// Flattened, serializable description of one ability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbilitySummary {
    /// The `namespace/slug` key.
    pub slug: String,
    /// Human label.
    pub name: String,
    pub description: String,
    pub provider: Provider,
    pub input_schema: Value,
    pub output_schema: Value,
    /// Everything the ability reported, unprocessed.
    pub raw_data: RawAbilityData,
}

/// Raw registration data of an ability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawAbilityData {
    pub name: String,
    pub label: String,
    pub description: String,
    pub input_schema: Value,
    pub output_schema: Value,
    pub meta: Value,
}

impl AbilitySummary {
    /// Build the summary of `ability`, classifying its provider.
    pub fn from_ability(ability: &dyn Invocable, context: &ProviderContext) -> Self {
        let name = ability.name();
        Self {
            slug: name.to_string(),
            name: ability.label().to_string(),
            description: ability.description().to_string(),
            provider: detect_provider(name, ability.meta(), context),
            input_schema: ability.input_schema().clone(),
            output_schema: ability.output_schema().clone(),
            raw_data: RawAbilityData {
                name: name.to_string(),
                label: ability.label().to_string(),
                description: ability.description().to_string(),
                input_schema: ability.input_schema().clone(),
                output_schema: ability.output_schema().clone(),
                meta: ability.meta().clone(),
            },
        }
    }
}
