use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::RequestContext;

/// `GET /validate?token=…`, the link from the validation email.
pub async fn validate_link(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Query(query): Query<dto::ValidateRequest>,
) -> axum::response::Response {
    validate(&services, ctx, query).await
}

/// `POST /validate` with `{"token": …}`, for manual code entry.
///
/// A missing or malformed body is treated as an empty token.
pub async fn validate_code(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    body: Result<Json<dto::ValidateRequest>, JsonRejection>,
) -> axum::response::Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(_) => dto::ValidateRequest { token: None },
    };
    validate(&services, ctx, request).await
}

async fn validate(
    services: &AppServices,
    ctx: RequestContext,
    request: dto::ValidateRequest,
) -> axum::response::Response {
    let token = request.token.unwrap_or_default();
    match services.validate(&token, ctx.received_at()).await {
        Ok(validated) => (StatusCode::OK, Json(dto::ValidateResponse::from(validated))).into_response(),
        Err(e) => errors::workflow_error_to_response(e),
    }
}
