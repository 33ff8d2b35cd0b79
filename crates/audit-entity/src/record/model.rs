//! Audit record entity model.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// An immutable audit event: who changed what, when, and from where.
///
/// Records are keyed by `event_id` in every backend. Updates to the audited
/// entity are modelled as new events, never as edits of a stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    /// Globally unique event identifier (assigned by the server when empty).
    #[serde(default)]
    pub event_id: String,
    /// When the change happened.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    /// Service that emitted the event.
    #[serde(default)]
    pub source_service: String,
    /// Kind of event (e.g. `"UserCreated"`).
    #[serde(default)]
    pub event_type: String,
    /// Type of the changed resource.
    #[serde(default)]
    pub entity_type: String,
    /// Identifier of the changed resource.
    #[serde(default)]
    pub entity_id: String,
    /// The principal responsible for the change.
    #[validate(nested)]
    pub changed_by: ChangedBy,
    /// Field name → old/new value.
    #[serde(default)]
    pub change_summary: BTreeMap<String, ChangeDetail>,
    /// Request origin details.
    #[serde(default)]
    pub metadata: RecordMetadata,
}

impl AuditRecord {
    /// Creates a record with the given id and author, stamped with the current time.
    pub fn new(event_id: impl Into<String>, changed_by: ChangedBy) -> Self {
        Self {
            event_id: event_id.into(),
            timestamp: Utc::now(),
            source_service: String::new(),
            event_type: String::new(),
            entity_type: String::new(),
            entity_id: String::new(),
            changed_by,
            change_summary: BTreeMap::new(),
            metadata: RecordMetadata::default(),
        }
    }

    /// Returns the id of the user who made the change.
    pub fn owner_id(&self) -> &str {
        &self.changed_by.user_id
    }

    /// Returns whether the record was authored by the given user.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.changed_by.user_id == user_id
    }

    /// Assigns a fresh event id if the caller did not supply one.
    pub fn with_assigned_id(mut self) -> Self {
        if self.event_id.trim().is_empty() {
            self.event_id = Uuid::new_v4().to_string();
        }
        self
    }
}

/// The principal that made an audited change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangedBy {
    /// Stable user identifier.
    #[validate(length(min = 1, message = "changedBy.userId must not be empty"))]
    #[serde(default)]
    pub user_id: String,
    /// Display/login name.
    #[serde(default)]
    pub username: String,
    /// Roles held at the time of the change, in the order reported.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl ChangedBy {
    /// Creates a new author.
    pub fn new(
        user_id: impl Into<String>,
        username: impl Into<String>,
        roles: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }
}

/// Before/after values of a single changed field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeDetail {
    /// Value before the change.
    pub old_value: Option<String>,
    /// Value after the change.
    pub new_value: Option<String>,
}

/// Where the change request came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMetadata {
    /// Client IP address.
    pub ip_address: Option<String>,
    /// Client User-Agent header.
    pub user_agent: Option<String>,
}
