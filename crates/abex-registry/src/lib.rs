//! # abex-registry — Ability Catalog
//!
//! Everything between the schema engine and a transport:
//!
//! - [`ability`] — the [`Invocable`] contract every catalog entry implements.
//! - [`registry`] — [`AbilityRegistry`], a clonable, thread-safe catalog keyed
//!   by `namespace/slug`.
//! - [`listing`] — search, provider filter, sorting, pagination, statistics.
//! - [`invoke`] — the validate-then-execute pipeline used by every caller.
//! - [`settings`] — injected named boolean toggles ([`SettingsStore`]).
//! - [`demo`] — built-in demo abilities that can be switched on and off.
//! - [`fixture`] — catalog files (YAML/JSON) loaded as fixed-result abilities.
//!
//! ## Crate Policy
//!
//! - The catalog is populated by the embedding host; this crate never
//!   discovers abilities on its own.
//! - Locks are `parking_lot` and are never held while an ability executes.

pub mod ability;
pub mod demo;
pub mod fixture;
pub mod invoke;
pub mod listing;
pub mod registry;
pub mod settings;

pub use ability::{AbilityFailure, Invocable};
pub use demo::site_health::{CheckResult, HealthCheck, HealthStatus, SiteHealthAbility};
pub use demo::{DemoError, DemoManager, DemoStatus, ToggleOutcome, DEMO_ABILITIES};
pub use fixture::{load_catalog, CatalogFileError, FixtureAbility, FixtureSpec};
pub use invoke::{check_input, invoke, Invocation, InvokeError};
pub use listing::{ListPage, ListQuery, ProviderCounts, Statistics, DEFAULT_PER_PAGE};
pub use registry::{AbilityRegistry, AbilitySummary, RegistryError};
pub use settings::{InMemorySettings, SettingsStore};
