//! Policy decisions.

use std::fmt;

use audit_core::error::AppError;
use audit_core::result::AppResult;

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No verified caller accompanied the request.
    Unauthenticated,
    /// A non-admin asked for another user's records.
    ForeignScope,
    /// A non-admin tried to delete a record they did not author.
    NotOwner,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "authentication required"),
            Self::ForeignScope => {
                write!(f, "non-admin users may only access their own audit logs")
            }
            Self::NotOwner => {
                write!(f, "only the author or an administrator may delete this audit log")
            }
        }
    }
}

impl From<DenyReason> for AppError {
    fn from(reason: DenyReason) -> Self {
        match reason {
            DenyReason::Unauthenticated => AppError::authentication(reason.to_string()),
            DenyReason::ForeignScope | DenyReason::NotOwner => {
                AppError::access_denied(reason.to_string())
            }
        }
    }
}

/// Outcome of a policy check: the (possibly rewritten) input, or a refusal.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision<T> {
    /// Proceed with the given value.
    Permit(T),
    /// Refuse the request.
    Deny(DenyReason),
}

impl<T> Decision<T> {
    /// Returns `true` if the request may proceed.
    pub fn is_permitted(&self) -> bool {
        matches!(self, Self::Permit(_))
    }

    /// Convert into a result, mapping refusals to their error kinds.
    pub fn into_result(self) -> AppResult<T> {
        match self {
            Self::Permit(value) => Ok(value),
            Self::Deny(reason) => Err(reason.into()),
        }
    }
}
