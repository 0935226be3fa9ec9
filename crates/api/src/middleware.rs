use std::time::Instant;

use axum::{
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;

use crate::context::{REQUEST_ID_HEADER, RequestContext};

/// Wrap each request in a span carrying its id, log completion, and echo the
/// id back in `x-request-id`.
pub async fn request_trace_middleware(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let ctx = RequestContext::from_headers(req.headers());
    let span = tracing::info_span!(
        "request",
        request_id = %ctx.request_id(),
        method = %req.method(),
        path = %req.uri().path(),
    );
    req.extensions_mut().insert(ctx);

    let started = Instant::now();
    let mut response = next.run(req).instrument(span.clone()).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    span.in_scope(|| {
        tracing::info!(status = response.status().as_u16(), elapsed_ms, "request completed");
    });

    if let Ok(value) = HeaderValue::from_str(&ctx.request_id().to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
