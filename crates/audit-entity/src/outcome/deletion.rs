//! Result of a delete request.

use serde::{Deserialize, Serialize};

/// What happened to a single delete call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeletionOutcome {
    /// The record was removed.
    Success {
        /// Number of removed documents.
        #[serde(rename = "deletedCount")]
        deleted_count: u64,
    },
    /// No record with the requested id exists.
    NotFound {
        /// Explanation naming the id.
        message: String,
    },
    /// A backend call failed while fetching or deleting.
    Failure {
        /// Backend failure description.
        reason: String,
    },
}

impl DeletionOutcome {
    /// Builds the not-found outcome for `event_id`.
    pub fn not_found(event_id: &str) -> Self {
        Self::NotFound {
            message: format!("Audit log with eventId {event_id} not found"),
        }
    }

    /// Returns `true` for a successful deletion.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
