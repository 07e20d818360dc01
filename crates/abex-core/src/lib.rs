//! # abex-core — Foundational Types for Ability Explorer
//!
//! Leaf crate of the workspace. Defines the identifiers and classifications
//! every other crate shares:
//!
//! - [`AbilityName`] — validated `namespace/slug` key of a catalog entry.
//! - [`Provider`] — which party registered an ability (Core, Plugin, Theme).
//! - [`NameError`] — rejection reasons for malformed ability names.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `abex-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod provider;

pub use error::NameError;
pub use identity::AbilityName;
pub use provider::{detect_provider, Provider, ProviderContext, CORE_NAMESPACES};
