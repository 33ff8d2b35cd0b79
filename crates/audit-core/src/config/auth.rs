//! Authentication and authorization configuration.

use serde::{Deserialize, Serialize};

/// Authentication settings and the static user directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Role marker that grants administrative access.
    #[serde(default = "default_admin_role")]
    pub admin_role: String,
    /// Users allowed to authenticate with HTTP Basic credentials.
    #[serde(default)]
    pub users: Vec<UserEntry>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_role: default_admin_role(),
            users: Vec::new(),
        }
    }
}

/// A single user known to the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEntry {
    /// Stable user identifier recorded in `changedBy.userId`.
    pub user_id: String,
    /// Login name used in Basic credentials.
    pub username: String,
    /// Argon2 password hash in PHC string format.
    pub password_hash: String,
    /// Roles granted to the user.
    #[serde(default)]
    pub roles: Vec<String>,
}

fn default_admin_role() -> String {
    "ROLE_ADMIN".to_string()
}
