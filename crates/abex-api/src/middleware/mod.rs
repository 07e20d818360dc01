//! # HTTP Middleware
//!
//! Tower layers applied to the application router.

pub mod tracing_layer;
