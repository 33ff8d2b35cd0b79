//! Route definitions for the audit trail HTTP API.
//!
//! All routes are mounted under `/api`.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new().merge(audit_routes()).merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Ingestion, retrieval, search and deletion
fn audit_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/audit/logs",
            post(handlers::audit::create_log).get(handlers::audit::list_logs),
        )
        .route(
            "/audit/logs/user/{user_id}",
            get(handlers::audit::logs_by_user),
        )
        .route(
            "/audit/logs/event/{event_id}",
            get(handlers::audit::log_by_event).delete(handlers::audit::delete_log),
        )
        .route(
            "/audit/query",
            get(handlers::audit::query_logs).post(handlers::audit::query_logs),
        )
}

/// Health endpoint
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
