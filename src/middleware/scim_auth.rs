//! SCIM bearer token guard
//!
//! Validates the shared-secret token on every SCIM request and injects a
//! `ScimRequestContext` carrying the externally visible base URL.

use crate::domain::scim::{ScimError, ScimRequestContext};
use crate::scim::api::ScimJson;
use crate::scim::routes::SCIM_BASE_PATH;
use crate::state::AppContext;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Reject the request with the SCIM error schema. A missing header and a
/// mismatched token produce the same body.
fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        ScimJson(ScimError::unauthorized("Unauthorized")),
    )
        .into_response()
}

pub async fn scim_auth_middleware<S: AppContext>(
    State(state): State<S>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    match token {
        Some(token) if token.as_bytes() == state.scim_token().as_bytes() => {}
        _ => return unauthorized(),
    }

    let base_url = {
        let scheme = if request
            .headers()
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            == Some("https")
        {
            "https"
        } else {
            "http"
        };
        let host = request
            .headers()
            .get("host")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("localhost");
        format!("{}://{}{}", scheme, host, SCIM_BASE_PATH)
    };

    request
        .extensions_mut()
        .insert(ScimRequestContext { base_url });
    next.run(request).await
}
