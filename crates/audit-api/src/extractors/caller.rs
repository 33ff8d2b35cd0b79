//! `Caller` extractor: verifies Basic credentials from the Authorization header.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use audit_core::error::AppError;
use audit_entity::CallerIdentity;

use crate::error::ApiError;
use crate::state::AppState;

/// The verified caller, or `None` for a request without credentials.
///
/// Whether anonymity is acceptable is the access policy's decision; bad
/// credentials are always rejected here.
#[derive(Debug, Clone)]
pub struct Caller(pub Option<CallerIdentity>);

impl Caller {
    /// Borrow the identity, if any.
    pub fn identity(&self) -> Option<&CallerIdentity> {
        self.0.as_ref()
    }
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(Caller(None));
        };

        let header = header
            .to_str()
            .map_err(|_| AppError::authentication("Invalid Authorization header"))?;

        let identity = state.users.authenticate_header(header)?;
        tracing::debug!(user_id = %identity.user_id, "Caller authenticated");
        Ok(Caller(Some(identity)))
    }
}
