//! Audit record ingestion, retrieval and deletion.

pub mod engine;
pub mod health;

pub use engine::AuditEngine;
pub use health::{BackendHealth, HealthReport};
