//! Per-request tracing middleware.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::Instrument;

/// Wrap each request in an `http.request` span and log its outcome.
pub(super) async fn trace_request(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let route = request.uri().path().to_owned();
    let span = tracing::info_span!("http.request", method = %method, route = %route);

    let started = Instant::now();
    let response = next.run(request).instrument(span.clone()).await;
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    span.in_scope(|| {
        tracing::debug!(
            status = response.status().as_u16(),
            elapsed_ms,
            "request completed"
        );
    });
    response
}
