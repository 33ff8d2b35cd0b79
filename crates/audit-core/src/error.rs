//! Unified application error types for the audit trail service.
//!
//! Storage backends report [`BackendError`]; everything above the storage
//! layer propagates [`AppError`] through the `?` operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested record was not found.
    NotFound,
    /// The request carried no usable identity, or its credentials were rejected.
    Authentication,
    /// The caller is identified but not allowed to perform the action.
    AccessDenied,
    /// Input validation failed.
    Validation,
    /// A storage backend call failed or timed out.
    Backend,
    /// A dual write reached one backend but not the other.
    PartialWrite,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal server error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Authentication => write!(f, "AUTHENTICATION"),
            Self::AccessDenied => write!(f, "ACCESS_DENIED"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Backend => write!(f, "BACKEND"),
            Self::PartialWrite => write!(f, "PARTIAL_WRITE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used above the storage layer.
///
/// Crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    /// Create an access-denied error.
    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AccessDenied, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a partial-write error caused by the failing backend call.
    pub fn partial_write(message: impl Into<String>, source: BackendError) -> Self {
        Self::with_source(ErrorKind::PartialWrite, message, source)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Returns `true` if this error has the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        Self::with_source(ErrorKind::Backend, err.to_string(), err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

/// A failed call against a storage backend.
///
/// Always names the backend and the operation so that operators can tell
/// which store misbehaved.
#[derive(Debug, Error)]
#[error("backend '{backend}' failed during {operation}: {message}")]
pub struct BackendError {
    /// Backend identity (e.g. `"elasticsearch"`, `"s3"`).
    pub backend: String,
    /// The storage operation that failed (e.g. `"put"`, `"query"`).
    pub operation: &'static str,
    /// A human-readable description of the failure.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl BackendError {
    /// Create a backend error without an underlying cause.
    pub fn new(
        backend: impl Into<String>,
        operation: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            backend: backend.into(),
            operation,
            message: message.into(),
            source: None,
        }
    }

    /// Create a backend error wrapping the client error that caused it.
    pub fn with_source(
        backend: impl Into<String>,
        operation: &'static str,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            backend: backend.into(),
            operation,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_names_backend_and_operation() {
        let err = BackendError::new("s3", "put", "connection reset");
        assert_eq!(
            err.to_string(),
            "backend 's3' failed during put: connection reset"
        );

        let app: AppError = err.into();
        assert!(app.is(ErrorKind::Backend));
        assert!(app.message.contains("'s3'"));
        assert!(std::error::Error::source(&app).is_some());
    }

    #[test]
    fn clone_drops_source() {
        let err = AppError::partial_write("half done", BackendError::new("s3", "put", "boom"));
        let cloned = err.clone();
        assert_eq!(cloned.kind, ErrorKind::PartialWrite);
        assert!(cloned.source.is_none());
    }
}
