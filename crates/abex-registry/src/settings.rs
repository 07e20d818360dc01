//! Named boolean toggles injected into the demo manager and transport.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

/// Store of named boolean options.
pub trait SettingsStore: Send + Sync {
    /// Stored value, `None` if never set.
    fn get(&self, key: &str) -> Option<bool>;

    /// Store a value.
    fn set(&self, key: &str, value: bool);

    /// Every stored option, ordered by key.
    fn snapshot(&self) -> BTreeMap<String, bool>;

    /// Stored value with unset keys treated as `false`.
    fn is_enabled(&self, key: &str) -> bool {
        self.get(key).unwrap_or(false)
    }
}

/// Process-local settings. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct InMemorySettings {
    values: Arc<RwLock<BTreeMap<String, bool>>>,
}

impl InMemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings pre-populated from `(key, value)` pairs.
    pub fn with_values<K: Into<String>>(values: impl IntoIterator<Item = (K, bool)>) -> Self {
        let values = values.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self {
            values: Arc::new(RwLock::new(values)),
        }
    }
}

impl SettingsStore for InMemorySettings {
    fn get(&self, key: &str) -> Option<bool> {
        self.values.read().get(key).copied()
    }

    fn set(&self, key: &str, value: bool) {
        self.values.write().insert(key.to_string(), value);
    }

    fn snapshot(&self) -> BTreeMap<String, bool> {
        self.values.read().clone()
    }
}
