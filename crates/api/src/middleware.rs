use std::time::Instant;

use axum::{
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use uuid::Uuid;

use crate::context::RequestContext;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Attach a [`RequestContext`] to the request and log its outcome.
pub async fn request_context(
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let ctx = RequestContext::new(Uuid::now_v7(), Utc::now());
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    req.extensions_mut().insert(ctx);

    let started = Instant::now();
    let mut res = next.run(req).await;
    let latency_ms = started.elapsed().as_millis() as u64;

    let status = res.status();
    if status.is_server_error() {
        tracing::error!(
            request_id = %ctx.request_id(),
            %method,
            %path,
            status = status.as_u16(),
            latency_ms,
            "request failed"
        );
    } else {
        tracing::info!(
            request_id = %ctx.request_id(),
            %method,
            %path,
            status = status.as_u16(),
            latency_ms,
            "request handled"
        );
    }

    if let Ok(value) = HeaderValue::from_str(&ctx.request_id().to_string()) {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    res
}
