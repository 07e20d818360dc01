//! # API Route Modules
//!
//! - `abilities` — catalog listing, statistics, detail, validation and
//!   invocation.
//! - `demos` — built-in demo toggles and the settings snapshot.

pub mod abilities;
pub mod demos;
