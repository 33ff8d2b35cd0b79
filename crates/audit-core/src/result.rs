//! Convenience result type alias for the audit trail service.

use crate::error::{AppError, BackendError};

/// A specialized `Result` type for service operations.
pub type AppResult<T> = Result<T, AppError>;

/// Result type returned by every storage backend call.
pub type BackendResult<T> = Result<T, BackendError>;
