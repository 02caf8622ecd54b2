//! SCIM User CRUD API handlers

use crate::domain::scim::{ScimPatchOp, ScimRequestContext, ScimUser};
use crate::error::AppError;
use crate::scim::api::{scim_error_response, ScimJson};
use crate::state::AppContext;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct ListParams {
    pub filter: Option<String>,
    #[serde(rename = "startIndex", default = "default_start")]
    pub start_index: i64,
    pub count: Option<i64>,
}

fn default_start() -> i64 {
    1
}

fn parse_user_id(id: &str) -> Result<i64, AppError> {
    id.parse::<i64>()
        .map_err(|_| AppError::BadRequest(format!("Invalid user ID: {}", id)))
}

/// Inbound bodies are taken as raw JSON so malformed payloads surface as a
/// SCIM-shaped 400 instead of an extractor rejection.
fn parse_body<T: serde::de::DeserializeOwned>(
    body: serde_json::Value,
    detail: &str,
) -> Result<T, AppError> {
    serde_json::from_value(body).map_err(|_| AppError::BadRequest(detail.to_string()))
}

/// GET /Users - List users with optional filter
pub async fn list_users<S: AppContext>(
    State(state): State<S>,
    Extension(ctx): Extension<ScimRequestContext>,
    Query(params): Query<ListParams>,
) -> Response {
    let count = params.count.unwrap_or(100).clamp(0, 100);
    match state
        .scim_service()
        .list_users(&ctx, params.filter.as_deref(), params.start_index, count)
        .await
    {
        Ok(response) => ScimJson(response).into_response(),
        Err(e) => scim_error_response(&e),
    }
}

/// GET /Users/{id} - Get user
pub async fn get_user<S: AppContext>(
    State(state): State<S>,
    Extension(ctx): Extension<ScimRequestContext>,
    Path(id): Path<String>,
) -> Response {
    let user_id = match parse_user_id(&id) {
        Ok(user_id) => user_id,
        Err(e) => return scim_error_response(&e),
    };

    match state.scim_service().get_user(user_id, &ctx).await {
        Ok(user) => ScimJson(user).into_response(),
        Err(e) => scim_error_response(&e),
    }
}

/// POST /Users - Create user
pub async fn create_user<S: AppContext>(
    State(state): State<S>,
    Extension(ctx): Extension<ScimRequestContext>,
    axum::Json(body): axum::Json<serde_json::Value>,
) -> Response {
    let scim_user: ScimUser = match parse_body(body, "Invalid SCIM user payload") {
        Ok(user) => user,
        Err(e) => return scim_error_response(&e),
    };

    match state.scim_service().create_user(&ctx, scim_user).await {
        Ok(user) => (StatusCode::CREATED, ScimJson(user)).into_response(),
        Err(e) => scim_error_response(&e),
    }
}

/// PUT /Users/{id} - Replace user
pub async fn replace_user<S: AppContext>(
    State(state): State<S>,
    Extension(ctx): Extension<ScimRequestContext>,
    Path(id): Path<String>,
    axum::Json(body): axum::Json<serde_json::Value>,
) -> Response {
    let user_id = match parse_user_id(&id) {
        Ok(user_id) => user_id,
        Err(e) => return scim_error_response(&e),
    };

    let scim_user: ScimUser = match parse_body(body, "Invalid SCIM user payload") {
        Ok(user) => user,
        Err(e) => return scim_error_response(&e),
    };

    match state
        .scim_service()
        .replace_user(user_id, &ctx, scim_user)
        .await
    {
        Ok(user) => ScimJson(user).into_response(),
        Err(e) => scim_error_response(&e),
    }
}

/// PATCH /Users/{id} - Patch user
pub async fn patch_user<S: AppContext>(
    State(state): State<S>,
    Extension(ctx): Extension<ScimRequestContext>,
    Path(id): Path<String>,
    axum::Json(body): axum::Json<serde_json::Value>,
) -> Response {
    let user_id = match parse_user_id(&id) {
        Ok(user_id) => user_id,
        Err(e) => return scim_error_response(&e),
    };

    let patch: ScimPatchOp = match parse_body(body, "Operations array is required") {
        Ok(patch) => patch,
        Err(e) => return scim_error_response(&e),
    };

    match state.scim_service().patch_user(user_id, &ctx, patch).await {
        Ok(user) => ScimJson(user).into_response(),
        Err(e) => scim_error_response(&e),
    }
}

/// DELETE /Users/{id} - Delete user
pub async fn delete_user<S: AppContext>(
    State(state): State<S>,
    Extension(ctx): Extension<ScimRequestContext>,
    Path(id): Path<String>,
) -> Response {
    let user_id = match parse_user_id(&id) {
        Ok(user_id) => user_id,
        Err(e) => return scim_error_response(&e),
    };

    match state.scim_service().delete_user(user_id, &ctx).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => scim_error_response(&e),
    }
}
