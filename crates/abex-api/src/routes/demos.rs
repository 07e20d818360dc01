//! # Demo Abilities and Settings API
//!
//! Lists the built-in demos, toggles them, and exposes the settings
//! snapshot that backs the toggles.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use abex_registry::{DemoStatus, SettingsStore, ToggleOutcome};

use crate::error::AppError;
use crate::state::AppState;

/// A demo with its enabled flag.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DemoView {
    pub key: String,
    pub name: String,
    /// Ability registered while the demo is enabled.
    pub slug: String,
    pub description: String,
    pub read_only: bool,
    pub enabled: bool,
}

impl From<DemoStatus> for DemoView {
    fn from(d: DemoStatus) -> Self {
        Self {
            key: d.key,
            name: d.name,
            slug: d.slug,
            description: d.description,
            read_only: d.read_only,
            enabled: d.enabled,
        }
    }
}

/// Result of a toggle.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ToggleResponse {
    pub enabled: bool,
    pub message: String,
}

impl From<ToggleOutcome> for ToggleResponse {
    fn from(t: ToggleOutcome) -> Self {
        Self {
            enabled: t.enabled,
            message: t.message,
        }
    }
}

/// Stored options, ordered by name.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SettingsResponse {
    pub options: BTreeMap<String, bool>,
}

/// Build the demos and settings router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/demos", get(list_demos))
        .route("/v1/demos/:key/toggle", post(toggle_demo))
        .route("/v1/settings", get(get_settings))
}

/// GET /v1/demos — List demo abilities.
#[utoipa::path(
    get,
    path = "/v1/demos",
    responses(
        (status = 200, description = "Demo abilities", body = Vec<DemoView>),
    ),
    tag = "demos"
)]
pub(crate) async fn list_demos(State(state): State<AppState>) -> Json<Vec<DemoView>> {
    Json(state.demos.list().into_iter().map(DemoView::from).collect())
}

/// POST /v1/demos/:key/toggle — Enable or disable a demo ability.
#[utoipa::path(
    post,
    path = "/v1/demos/{key}/toggle",
    params(("key" = String, Path, description = "Demo key, e.g. site-health")),
    responses(
        (status = 200, description = "New state", body = ToggleResponse),
        (status = 404, description = "Unknown demo", body = crate::error::ErrorBody),
        (
            status = 409,
            description = "Name held by another ability",
            body = crate::error::ErrorBody
        ),
    ),
    tag = "demos"
)]
pub(crate) async fn toggle_demo(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ToggleResponse>, AppError> {
    let outcome = state.demos.toggle(&key)?;
    Ok(Json(outcome.into()))
}

/// GET /v1/settings — Snapshot of stored options.
#[utoipa::path(
    get,
    path = "/v1/settings",
    responses(
        (status = 200, description = "Stored options", body = SettingsResponse),
    ),
    tag = "demos"
)]
pub(crate) async fn get_settings(State(state): State<AppState>) -> Json<SettingsResponse> {
    Json(SettingsResponse {
        options: state.settings.snapshot(),
    })
}
