//! Request/response logging middleware.

use std::time::{Duration, Instant};

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info, warn};

/// Logs method, path, status and latency of every request. Server errors
/// are logged at `warn`.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let authenticated = request
        .headers()
        .contains_key(axum::http::header::AUTHORIZATION);
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status().as_u16();
    let latency_ms = millis(started.elapsed());

    if response.status().is_server_error() {
        warn!(%method, %path, status, latency_ms, authenticated, "Request failed");
    } else {
        info!(%method, %path, status, latency_ms, authenticated, "Request served");
    }

    response
}

/// Saturates instead of truncating the `u128` millisecond count.
fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
