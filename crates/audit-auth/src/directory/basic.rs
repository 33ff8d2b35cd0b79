//! HTTP Basic credential parsing.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use audit_core::error::AppError;

/// Username and password from an `Authorization: Basic ...` header.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    /// Login name.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl BasicCredentials {
    /// Parse an `Authorization` header value.
    pub fn parse(header: &str) -> Result<Self, AppError> {
        let encoded = header
            .strip_prefix("Basic ")
            .or_else(|| header.strip_prefix("basic "))
            .ok_or_else(|| AppError::authentication("Unsupported authorization scheme"))?;

        let decoded = STANDARD
            .decode(encoded.trim())
            .map_err(|_| AppError::authentication("Malformed Basic credentials"))?;
        let decoded = String::from_utf8(decoded)
            .map_err(|_| AppError::authentication("Malformed Basic credentials"))?;

        let (username, password) = decoded
            .split_once(':')
            .ok_or_else(|| AppError::authentication("Malformed Basic credentials"))?;

        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Encode as an `Authorization` header value.
    pub fn to_header(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {token}")
    }
}
