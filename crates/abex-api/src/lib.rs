//! # abex-api — Axum API for Ability Explorer
//!
//! HTTP surface over the ability catalog.
//!
//! ## API Surface
//!
//! | Prefix               | Module                   | Domain                 |
//! |----------------------|--------------------------|------------------------|
//! | `/v1/abilities*`     | [`routes::abilities`]    | Catalog and invocation |
//! | `/v1/demos*`         | [`routes::demos`]        | Demo toggles           |
//! | `/v1/settings`       | [`routes::demos`]        | Settings snapshot      |
//! | `/openapi.json`      | [`openapi`]              | OpenAPI document       |
//! | `/health/liveness`   | here                     | Liveness probe         |
//!
//! ## Middleware Stack
//!
//! ```text
//! TraceLayer → body limit (2 MiB) → Handler
//! ```
//!
//! ## Crate Policy
//!
//! - No business logic in route handlers; they delegate to `abex-registry`
//!   and `abex-schema`.
//! - All non-envelope errors map to structured HTTP responses via `AppError`.

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::Router;

pub use error::AppError;
pub use state::{AppConfig, AppState};

/// Maximum accepted request body size.
pub const BODY_LIMIT_BYTES: usize = 2 * 1024 * 1024;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::abilities::router())
        .merge(routes::demos::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(middleware::tracing_layer::layer())
        .with_state(state);

    let health = Router::new().route("/health/liveness", axum::routing::get(liveness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}
