//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into one OpenAPI document served
//! at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ability Explorer API",
        version = "0.1.0",
        description = "Browse, inspect, validate and invoke registered abilities."
    ),
    paths(
        crate::routes::abilities::list_abilities,
        crate::routes::abilities::ability_statistics,
        crate::routes::abilities::get_ability,
        crate::routes::abilities::validate_ability_input,
        crate::routes::abilities::invoke_ability,
        crate::routes::demos::list_demos,
        crate::routes::demos::toggle_demo,
        crate::routes::demos::get_settings,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::abilities::AbilityView,
        crate::routes::abilities::AbilityListResponse,
        crate::routes::abilities::ProviderCountsView,
        crate::routes::abilities::StatisticsResponse,
        crate::routes::abilities::FieldView,
        crate::routes::abilities::AbilityDetailResponse,
        crate::routes::abilities::AbilityInputRequest,
        crate::routes::abilities::ValidationResponse,
        crate::routes::abilities::InvokeResponse,
        crate::routes::demos::DemoView,
        crate::routes::demos::ToggleResponse,
        crate::routes::demos::SettingsResponse,
    )),
    tags(
        (name = "abilities", description = "Ability catalog and invocation"),
        (name = "demos", description = "Built-in demo abilities and settings"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
