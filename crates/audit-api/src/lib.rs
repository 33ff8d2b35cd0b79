//! # audit-api
//!
//! HTTP API layer for the audit trail service built on Axum.
//!
//! Provides the REST endpoints, the Basic-auth caller extractor, request
//! logging, and the mapping from `AppError` to JSON error responses.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
