//! # Abilities API
//!
//! Browse, inspect, validate and invoke catalog entries.
//!
//! Requests that name an ability carry `{ability, input}` where `input` is
//! the JSON text typed into a form (see [`decode_input`]).

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use abex_registry::{
    check_input, invoke, AbilitySummary, InvokeError, ListPage, ListQuery, Statistics,
};
use abex_schema::{generate_example, FieldSummary, Schema};

use crate::error::AppError;
use crate::extractors::{decode_input, extract_json, extract_query};
use crate::state::AppState;

/// Listing parameters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Case-insensitive match on name, slug or description.
    pub search: Option<String>,
    /// `Core`, `Plugin`, `Theme`, a custom label, or `all`.
    pub provider: Option<String>,
    /// `name` (default), `slug` or `provider`.
    pub orderby: Option<String>,
    /// `asc` (default) or `desc`.
    pub order: Option<String>,
    /// 1-based page number.
    pub page: Option<usize>,
    /// Page size (default 20).
    pub per_page: Option<usize>,
}

impl From<ListParams> for ListQuery {
    fn from(p: ListParams) -> Self {
        Self {
            search: p.search,
            provider: p.provider,
            orderby: p.orderby,
            order: p.order,
            page: p.page,
            per_page: p.per_page,
        }
    }
}

/// One catalog entry.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AbilityView {
    /// `namespace/slug` key.
    pub slug: String,
    /// Human label.
    pub name: String,
    pub description: String,
    pub provider: String,
    #[schema(value_type = Object)]
    pub input_schema: Value,
    #[schema(value_type = Object)]
    pub output_schema: Value,
    /// Registration data as reported by the ability.
    #[schema(value_type = Object)]
    pub raw_data: Value,
}

impl From<AbilitySummary> for AbilityView {
    fn from(s: AbilitySummary) -> Self {
        let raw_data = serde_json::to_value(&s.raw_data).unwrap_or(Value::Null);
        Self {
            slug: s.slug,
            name: s.name,
            description: s.description,
            provider: s.provider.as_str().to_string(),
            input_schema: s.input_schema,
            output_schema: s.output_schema,
            raw_data,
        }
    }
}

/// A page of abilities.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AbilityListResponse {
    pub items: Vec<AbilityView>,
    pub total_items: usize,
    pub total_pages: usize,
    pub page: usize,
    pub per_page: usize,
}

impl From<ListPage> for AbilityListResponse {
    fn from(page: ListPage) -> Self {
        Self {
            items: page.items.into_iter().map(AbilityView::from).collect(),
            total_items: page.total_items,
            total_pages: page.total_pages,
            page: page.page,
            per_page: page.per_page,
        }
    }
}

/// Counts per standard provider.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProviderCountsView {
    #[serde(rename = "Core")]
    pub core: usize,
    #[serde(rename = "Plugin")]
    pub plugin: usize,
    #[serde(rename = "Theme")]
    pub theme: usize,
}

/// Catalog statistics.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatisticsResponse {
    pub total: usize,
    pub by_provider: ProviderCountsView,
}

impl From<Statistics> for StatisticsResponse {
    fn from(s: Statistics) -> Self {
        Self {
            total: s.total,
            by_provider: ProviderCountsView {
                core: s.by_provider.core,
                plugin: s.by_provider.plugin,
                theme: s.by_provider.theme,
            },
        }
    }
}

/// One declared input property.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FieldView {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: Option<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<FieldSummary> for FieldView {
    fn from(f: FieldSummary) -> Self {
        Self {
            name: f.name,
            field_type: f.schema_type,
            required: f.required,
            description: f.description,
        }
    }
}

/// Detail view: the entry, a generated example input and its input fields.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AbilityDetailResponse {
    pub ability: AbilityView,
    #[schema(value_type = Object)]
    pub example_input: Value,
    pub fields: Vec<FieldView>,
}

/// Body of validate and invoke requests.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AbilityInputRequest {
    /// `namespace/slug` of the target ability.
    #[serde(default)]
    pub ability: String,
    /// JSON text (or a JSON value). Absent means `{}`.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub input: Option<Value>,
}

/// Pre-submit validation result.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidationResponse {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Invocation envelope, for both success and failure.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InvokeResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invocation_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoked_at: Option<DateTime<Utc>>,
}

impl InvokeResponse {
    fn failure(err: &InvokeError) -> (StatusCode, Self) {
        let status = match err {
            InvokeError::MissingSlug => StatusCode::BAD_REQUEST,
            InvokeError::NotFound(_) => StatusCode::NOT_FOUND,
            InvokeError::Validation { .. } | InvokeError::Failed(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        };
        let (errors, code) = match err {
            InvokeError::Validation { errors } => (Some(errors.clone()), None),
            InvokeError::Failed(failure) => (None, Some(failure.code.clone())),
            InvokeError::MissingSlug | InvokeError::NotFound(_) => (None, None),
        };
        let body = Self {
            success: false,
            message: err.to_string(),
            data: None,
            errors,
            code,
            invocation_id: None,
            invoked_at: None,
        };
        (status, body)
    }
}

/// Build the abilities router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/abilities", get(list_abilities))
        .route("/v1/abilities/statistics", get(ability_statistics))
        .route("/v1/abilities/validate", post(validate_ability_input))
        .route("/v1/abilities/invoke", post(invoke_ability))
        .route("/v1/abilities/:namespace/:slug", get(get_ability))
}

/// GET /v1/abilities — Search, filter, sort and paginate the catalog.
#[utoipa::path(
    get,
    path = "/v1/abilities",
    params(ListParams),
    responses(
        (status = 200, description = "Page of abilities", body = AbilityListResponse),
        (status = 400, description = "Malformed query string", body = crate::error::ErrorBody),
    ),
    tag = "abilities"
)]
pub(crate) async fn list_abilities(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<AbilityListResponse>, AppError> {
    let query = ListQuery::from(extract_query(params)?);
    Ok(Json(state.registry.query(&query).into()))
}

/// GET /v1/abilities/statistics — Ability counts per provider.
#[utoipa::path(
    get,
    path = "/v1/abilities/statistics",
    responses(
        (status = 200, description = "Catalog statistics", body = StatisticsResponse),
    ),
    tag = "abilities"
)]
pub(crate) async fn ability_statistics(State(state): State<AppState>) -> Json<StatisticsResponse> {
    Json(state.registry.statistics().into())
}

/// GET /v1/abilities/:namespace/:slug — One ability with an example input.
#[utoipa::path(
    get,
    path = "/v1/abilities/{namespace}/{slug}",
    params(
        ("namespace" = String, Path, description = "Ability namespace"),
        ("slug" = String, Path, description = "Ability slug"),
    ),
    responses(
        (status = 200, description = "Ability detail", body = AbilityDetailResponse),
        (status = 404, description = "Ability not found", body = crate::error::ErrorBody),
    ),
    tag = "abilities"
)]
pub(crate) async fn get_ability(
    State(state): State<AppState>,
    Path((namespace, slug)): Path<(String, String)>,
) -> Result<Json<AbilityDetailResponse>, AppError> {
    let name = format!("{namespace}/{slug}");
    let summary = state
        .registry
        .describe(&name)
        .ok_or_else(|| AppError::NotFound(format!("ability \"{name}\"")))?;

    let schema = Schema::from_value(&summary.input_schema);
    let example_input = generate_example(&summary.input_schema);
    let fields = schema.field_summaries().into_iter().map(FieldView::from).collect();

    Ok(Json(AbilityDetailResponse {
        ability: summary.into(),
        example_input,
        fields,
    }))
}

/// POST /v1/abilities/validate — Check input without executing.
#[utoipa::path(
    post,
    path = "/v1/abilities/validate",
    request_body = AbilityInputRequest,
    responses(
        (status = 200, description = "Validation result", body = ValidationResponse),
        (status = 400, description = "Missing ability slug", body = crate::error::ErrorBody),
        (status = 404, description = "Ability not found", body = crate::error::ErrorBody),
        (status = 422, description = "Input is not valid JSON", body = crate::error::ErrorBody),
    ),
    tag = "abilities"
)]
pub(crate) async fn validate_ability_input(
    State(state): State<AppState>,
    body: Result<Json<AbilityInputRequest>, JsonRejection>,
) -> Result<Json<ValidationResponse>, AppError> {
    let req = extract_json(body)?;
    let input = decode_input(req.input)?;
    let result = check_input(&state.registry, &req.ability, &input).map_err(|err| match err {
        InvokeError::NotFound(name) => AppError::NotFound(format!("ability \"{name}\"")),
        other => AppError::BadRequest(other.to_string()),
    })?;
    Ok(Json(ValidationResponse {
        valid: result.valid,
        errors: result.errors,
    }))
}

/// POST /v1/abilities/invoke — Validate and execute an ability.
#[utoipa::path(
    post,
    path = "/v1/abilities/invoke",
    request_body = AbilityInputRequest,
    responses(
        (status = 200, description = "Ability invoked", body = InvokeResponse),
        (status = 400, description = "Missing ability slug", body = InvokeResponse),
        (status = 404, description = "Ability not found", body = InvokeResponse),
        (
            status = 422,
            description = "Validation failed or ability reported failure",
            body = InvokeResponse
        ),
    ),
    tag = "abilities"
)]
pub(crate) async fn invoke_ability(
    State(state): State<AppState>,
    body: Result<Json<AbilityInputRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<InvokeResponse>), AppError> {
    let req = extract_json(body)?;
    let input = decode_input(req.input)?;

    let registry = state.registry.clone();
    let ability = req.ability;
    let outcome = tokio::task::spawn_blocking(move || invoke(&registry, &ability, input))
        .await
        .map_err(|e| AppError::Internal(format!("invocation task failed: {e}")))?;

    let (status, body) = match outcome {
        Ok(invocation) => (
            StatusCode::OK,
            InvokeResponse {
                success: true,
                message: "Ability invoked successfully.".to_string(),
                data: Some(invocation.data),
                errors: None,
                code: None,
                invocation_id: Some(invocation.id),
                invoked_at: Some(invocation.invoked_at),
            },
        ),
        Err(err) => InvokeResponse::failure(&err),
    };
    Ok((status, Json(body)))
}
