//! # audit-core
//!
//! Core crate for the audit trail service. Contains configuration schemas,
//! pagination/sorting types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other audit crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{AppError, BackendError, ErrorKind};
pub use result::AppResult;
