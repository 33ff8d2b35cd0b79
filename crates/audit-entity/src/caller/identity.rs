//! Authenticated caller identity.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The verified principal behind a request. Built per request, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerIdentity {
    /// Stable user id, compared against `changedBy.userId`.
    pub user_id: String,
    /// Login name.
    pub username: String,
    /// Granted roles.
    pub roles: BTreeSet<String>,
}

impl CallerIdentity {
    /// Creates a caller identity.
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

    /// Returns whether the caller holds the given role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Returns whether the caller holds the admin role marker.
    pub fn is_admin(&self, admin_role: &str) -> bool {
        self.has_role(admin_role)
    }
}
