//! # audit-auth
//!
//! Authentication and authorization for the audit trail service.
//!
//! ## Modules
//!
//! - `policy`: access rules for reading, searching and deleting audit records
//! - `directory`: static user directory and HTTP Basic credential verification
//! - `password`: Argon2id password hashing and verification

pub mod directory;
pub mod password;
pub mod policy;

pub use directory::UserDirectory;
pub use password::PasswordHasher;
pub use policy::{AccessPolicy, Decision, DenyReason};
