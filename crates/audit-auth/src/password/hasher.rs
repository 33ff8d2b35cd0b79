//! Argon2id password hashing and verification.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};

use audit_core::error::AppError;

/// Handles password hashing and verification using Argon2id.
///
/// Verification takes its cost parameters from the stored hash, so the
/// parameters here only affect newly created hashes.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Creates a hasher with the default Argon2id cost parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a hasher with explicit cost parameters.
    pub fn with_params(params: Params) -> Self {
        Self { params }
    }

    /// Hashes a plaintext password into a PHC string with a random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored PHC hash.
    ///
    /// Returns `Ok(true)` if the password matches, `Ok(false)` if not.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::configuration(format!("Invalid password hash format: {e}")))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> PasswordHasher {
        PasswordHasher::with_params(Params::new(8, 1, 1, None).unwrap())
    }

    #[test]
    fn hash_then_verify() {
        let hasher = fast();
        let hash = hasher.hash_password("admin123").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("admin123", &hash).unwrap());
        assert!(!hasher.verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn salts_differ() {
        let hasher = fast();
        let a = hasher.hash_password("same").unwrap();
        let b = hasher.hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn salt_is_full_length() {
        let hash = fast().hash_password("same").unwrap();
        let parsed = PasswordHash::new(&hash).unwrap();
        // 16 random bytes encode to 22 unpadded base64 characters.
        assert_eq!(parsed.salt.unwrap().as_str().len(), 22);
    }

    #[test]
    fn default_params_are_used_for_new_hashes() {
        let hash = PasswordHasher::new().hash_password("x").unwrap();
        assert!(hash.contains("m=19456,t=2,p=1"));
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let err = PasswordHasher::new()
            .verify_password("x", "not-a-phc-string")
            .unwrap_err();
        assert!(err.is(audit_core::ErrorKind::Configuration));
    }
}
