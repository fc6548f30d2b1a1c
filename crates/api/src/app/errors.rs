use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use supplierbank_core::DomainError;
use supplierbank_infra::WorkflowError;

pub fn workflow_error_to_response(err: WorkflowError) -> axum::response::Response {
    match err {
        WorkflowError::Domain(e) => domain_error_to_response(e),
        WorkflowError::Store(msg) => {
            tracing::error!("supplier store failure: {msg}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                "the supplier store is unavailable, try again later",
            )
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation { field } => json_field_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            err.to_string(),
            field,
        ),
        DomainError::DuplicateKey { field } => json_field_error(
            StatusCode::CONFLICT,
            "duplicate_key",
            err.to_string(),
            field.as_str(),
        ),
        DomainError::InvalidOrExpiredToken => json_error(
            StatusCode::BAD_REQUEST,
            "invalid_or_expired_token",
            err.to_string(),
        ),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// [`json_error`] plus the name of the offending form field.
pub fn json_field_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
    field: &'static str,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
            "field": field,
        })),
    )
        .into_response()
}
