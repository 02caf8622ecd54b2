//! SCIM API handlers and response types

pub mod discovery;
pub mod users;

use crate::domain::scim::ScimError;
use crate::error::AppError;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Wrapper that serializes `T` as JSON with `Content-Type: application/scim+json`.
pub struct ScimJson<T>(pub T);

impl<T: Serialize> IntoResponse for ScimJson<T> {
    fn into_response(self) -> Response {
        let mut response = axum::Json(self.0).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/scim+json;charset=utf-8"),
        );
        response
    }
}

/// Translate an application error into the SCIM error schema. Store and
/// validation failures never escape as anything but a protocol-shaped body.
pub fn scim_error_response(err: &AppError) -> Response {
    let (status, body) = match err {
        AppError::NotFound(_) => (StatusCode::NOT_FOUND, ScimError::not_found(err.to_string())),
        AppError::BadRequest(_) | AppError::Validation(_) => (
            StatusCode::BAD_REQUEST,
            ScimError::bad_request(err.to_string()),
        ),
        AppError::Conflict(_) => (StatusCode::CONFLICT, ScimError::conflict(err.to_string())),
        AppError::Unauthorized(_) => (
            StatusCode::UNAUTHORIZED,
            ScimError::unauthorized(err.to_string()),
        ),
        AppError::Database(_) | AppError::Internal(_) => {
            tracing::error!("SCIM request failed: {:?}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ScimError::internal("Internal server error"),
            )
        }
    };
    (status, ScimJson(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scim_json_content_type() {
        let response = ScimJson(serde_json::json!({"ok": true})).into_response();
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/scim+json;charset=utf-8"
        );
    }

    #[test]
    fn test_error_translation_statuses() {
        let cases = vec![
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Conflict("x".into()), StatusCode::CONFLICT),
            (AppError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (
                AppError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            let response = scim_error_response(&err);
            assert_eq!(response.status(), expected, "error: {}", err);
        }
    }
}
