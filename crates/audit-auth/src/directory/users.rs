//! Configured users and credential verification.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use tracing::{debug, warn};

use audit_core::config::auth::{AuthConfig, UserEntry};
use audit_core::error::AppError;
use audit_entity::CallerIdentity;

use super::basic::BasicCredentials;
use crate::password::PasswordHasher;

/// Plaintext behind the hash checked for unknown usernames.
const DECOY_PASSWORD: &str = "decoy-password-for-unknown-users";

/// Users allowed to call the read/search/delete endpoints, keyed by login name.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: HashMap<String, UserEntry>,
    hasher: PasswordHasher,
    /// Hash verified when the username is unknown, built on first use.
    decoy_hash: Arc<OnceLock<String>>,
}

impl UserDirectory {
    /// Creates a directory from explicit entries.
    pub fn new(entries: impl IntoIterator<Item = UserEntry>) -> Self {
        Self::with_hasher(entries, PasswordHasher::new())
    }

    /// Creates a directory whose decoy hash uses `hasher`'s cost parameters.
    ///
    /// Use the parameters the configured hashes were created with, so that
    /// unknown and known usernames cost the same to reject.
    pub fn with_hasher(
        entries: impl IntoIterator<Item = UserEntry>,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            users: entries
                .into_iter()
                .map(|entry| (entry.username.clone(), entry))
                .collect(),
            hasher,
            decoy_hash: Arc::default(),
        }
    }

    /// Creates a directory from auth configuration.
    pub fn from_config(config: &AuthConfig) -> Self {
        if config.users.is_empty() {
            warn!("No users configured; every authenticated endpoint will reject requests");
        }
        Self::new(config.users.iter().cloned())
    }

    /// Number of known users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns `true` when no users are configured.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Verifies a username/password pair.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<CallerIdentity, AppError> {
        let Some(entry) = self.users.get(username) else {
            self.verify_decoy(password);
            debug!(username, "Unknown user");
            return Err(AppError::authentication("Invalid username or password"));
        };

        if !self.hasher.verify_password(password, &entry.password_hash)? {
            debug!(username, "Password mismatch");
            return Err(AppError::authentication("Invalid username or password"));
        }

        Ok(CallerIdentity::new(
            entry.user_id.clone(),
            entry.username.clone(),
            entry.roles.iter().cloned(),
        ))
    }

    /// Spends one Argon2 verification so unknown usernames are rejected as
    /// slowly as wrong passwords.
    fn verify_decoy(&self, password: &str) {
        let hash = match self.decoy_hash.get() {
            Some(hash) => hash,
            None => match self.hasher.hash_password(DECOY_PASSWORD) {
                Ok(hash) => self.decoy_hash.get_or_init(|| hash),
                Err(e) => {
                    warn!(error = %e, "Could not build decoy password hash");
                    return;
                }
            },
        };
        let _ = self.hasher.verify_password(password, hash);
    }

    /// Verifies an `Authorization: Basic ...` header value.
    pub fn authenticate_header(&self, header: &str) -> Result<CallerIdentity, AppError> {
        let creds = BasicCredentials::parse(header)?;
        self.authenticate(&creds.username, &creds.password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audit_core::ErrorKind;

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::with_params(argon2::Params::new(8, 1, 1, None).unwrap())
    }

    fn directory() -> UserDirectory {
        let hasher = fast_hasher();
        let entries = [
            UserEntry {
                user_id: "admin123".into(),
                username: "admin".into(),
                password_hash: hasher.hash_password("adminpass").unwrap(),
                roles: vec!["ROLE_ADMIN".into()],
            },
            UserEntry {
                user_id: "user-001".into(),
                username: "user-001".into(),
                password_hash: hasher.hash_password("userpass").unwrap(),
                roles: vec!["ROLE_USER".into()],
            },
        ];
        UserDirectory::with_hasher(entries, hasher)
    }

    #[test]
    fn valid_credentials_yield_identity() {
        let caller = directory().authenticate("admin", "adminpass").unwrap();
        assert_eq!(caller.user_id, "admin123");
        assert!(caller.has_role("ROLE_ADMIN"));
    }

    #[test]
    fn wrong_password_and_unknown_user_are_rejected() {
        let dir = directory();
        let err = dir.authenticate("admin", "nope").unwrap_err();
        assert!(err.is(ErrorKind::Authentication));
        let err = dir.authenticate("ghost", "adminpass").unwrap_err();
        assert!(err.is(ErrorKind::Authentication));
    }

    #[test]
    fn unknown_user_still_runs_a_verification() {
        let dir = directory();
        assert!(dir.decoy_hash.get().is_none());

        dir.authenticate("admin", "nope").unwrap_err();
        assert!(dir.decoy_hash.get().is_none());

        dir.authenticate("ghost", "whatever").unwrap_err();
        let decoy = dir.decoy_hash.get().expect("decoy hash built for unknown user");
        assert!(decoy.contains("m=8,t=1,p=1"));
        assert!(dir.hasher.verify_password(DECOY_PASSWORD, decoy).unwrap());

        // Clones share the decoy.
        assert!(dir.clone().decoy_hash.get().is_some());
    }

    #[test]
    fn header_round_trip() {
        let header = BasicCredentials {
            username: "user-001".into(),
            password: "userpass".into(),
        }
        .to_header();
        let caller = directory().authenticate_header(&header).unwrap();
        assert_eq!(caller.user_id, "user-001");
    }
}
