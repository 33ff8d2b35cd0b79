//! Application state shared across all handlers.

use std::sync::Arc;

use audit_auth::UserDirectory;
use audit_engine::AuditEngine;

/// Shared dependencies, passed to every handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Audit engine.
    pub engine: Arc<AuditEngine>,
    /// Users allowed to authenticate.
    pub users: Arc<UserDirectory>,
}

impl AppState {
    /// Creates the state from its parts.
    pub fn new(engine: AuditEngine, users: UserDirectory) -> Self {
        Self {
            engine: Arc::new(engine),
            users: Arc::new(users),
        }
    }
}
