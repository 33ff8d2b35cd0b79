//! Backend reachability report.

use serde::Serialize;

use audit_entity::BackendRole;

/// Reachability of the backend serving one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendHealth {
    /// Role the backend serves.
    pub role: BackendRole,
    /// Backend identity.
    pub backend: String,
    /// Whether the last probe succeeded.
    pub healthy: bool,
}

/// Aggregated health of all storage roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    /// `"UP"` when every backend is reachable, `"DOWN"` otherwise.
    pub status: &'static str,
    /// Per-role details.
    pub backends: Vec<BackendHealth>,
}

impl HealthReport {
    /// Build a report from per-role probes.
    pub fn new(backends: Vec<BackendHealth>) -> Self {
        let status = if backends.iter().all(|b| b.healthy) {
            "UP"
        } else {
            "DOWN"
        };
        Self { status, backends }
    }

    /// Returns `true` when every backend is reachable.
    pub fn is_healthy(&self) -> bool {
        self.status == "UP"
    }
}
