//! # audit-storage
//!
//! Storage backends for audit records. Every backend implements
//! [`StorageBackend`]; the [`BackendRegistry`] binds the searchable and
//! archival roles to concrete backends at startup.

pub mod backend;
pub mod providers;
pub mod query;
pub mod registry;

pub use backend::StorageBackend;
pub use providers::MemoryBackend;
pub use registry::BackendRegistry;
