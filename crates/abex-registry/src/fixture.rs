//! # Catalog Files
//!
//! Loads abilities from a YAML or JSON file. Each entry becomes a
//! [`FixtureAbility`] that returns its fixed `result` when executed, which
//! lets the CLI and tests exercise listing, validation and invocation
//! without a live host.
//!
//! ```yaml
//! abilities:
//!   - name: acme/greet
//!     label: Greet
//!     input_schema:
//!       type: object
//!       required: [name]
//!       properties:
//!         name: { type: string }
//!     result: { greeting: hello }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use abex_core::AbilityName;

use crate::ability::{AbilityFailure, Invocable};
use crate::registry::{AbilityRegistry, RegistryError};

/// Errors loading a catalog file.
#[derive(Error, Debug)]
pub enum CatalogFileError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML catalog {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to parse JSON catalog {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// One catalog entry as written in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FixtureSpec {
    pub name: AbilityName,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub input_schema: Value,
    #[serde(default)]
    pub output_schema: Value,
    #[serde(default)]
    pub meta: Value,
    /// Returned verbatim by `execute`.
    #[serde(default)]
    pub result: Value,
    /// When set, `execute` fails with this instead of returning `result`.
    #[serde(default)]
    pub error: Option<FixtureError>,
}

/// Failure a fixture reports on every execution.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FixtureError {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    abilities: Vec<FixtureSpec>,
}

/// An ability backed by a catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureAbility {
    spec: FixtureSpec,
    label: String,
}

impl FixtureAbility {
    pub fn new(spec: FixtureSpec) -> Self {
        let label = spec
            .label
            .clone()
            .unwrap_or_else(|| spec.name.slug().to_string());
        Self { spec, label }
    }
}

impl Invocable for FixtureAbility {
    fn name(&self) -> &AbilityName {
        &self.spec.name
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn description(&self) -> &str {
        &self.spec.description
    }

    fn input_schema(&self) -> &Value {
        &self.spec.input_schema
    }

    fn output_schema(&self) -> &Value {
        &self.spec.output_schema
    }

    fn meta(&self) -> &Value {
        &self.spec.meta
    }

    fn execute(&self, _input: Option<Value>) -> Result<Value, AbilityFailure> {
        match &self.spec.error {
            Some(err) => Err(AbilityFailure::new(&err.code, &err.message)),
            None => Ok(self.spec.result.clone()),
        }
    }
}

/// Parse a catalog file. `.json` files are read as JSON, anything else as
/// YAML.
pub fn load_catalog(path: &Path) -> Result<Vec<FixtureAbility>, CatalogFileError> {
    let content = std::fs::read_to_string(path).map_err(|source| CatalogFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let file: CatalogFile = if is_json {
        serde_json::from_str(&content).map_err(|source| CatalogFileError::Json {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        serde_yaml::from_str(&content).map_err(|source| CatalogFileError::Yaml {
            path: path.to_path_buf(),
            source,
        })?
    };

    tracing::debug!(path = %path.display(), count = file.abilities.len(), "loaded catalog file");
    Ok(file.abilities.into_iter().map(FixtureAbility::new).collect())
}

impl AbilityRegistry {
    /// Register every ability in a catalog file. Returns how many were added.
    ///
    /// A name clash anywhere in the file registers nothing.
    pub fn load_file(&self, path: &Path) -> Result<usize, CatalogFileError> {
        let abilities: Vec<Arc<dyn Invocable>> = load_catalog(path)?
            .into_iter()
            .map(|ability| Arc::new(ability) as Arc<dyn Invocable>)
            .collect();
        Ok(self.register_all(abilities)?)
    }
}
