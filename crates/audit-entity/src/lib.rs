//! # audit-entity
//!
//! Domain models for the audit trail service. Records and filters derive
//! `Serialize`/`Deserialize` with camelCase field names, which is the shape
//! used both on the wire and in every storage backend.

pub mod caller;
pub mod filter;
pub mod outcome;
pub mod record;
pub mod storage;

pub use caller::CallerIdentity;
pub use filter::SearchFilter;
pub use outcome::DeletionOutcome;
pub use record::{AuditRecord, ChangeDetail, ChangedBy, RecordMetadata};
pub use storage::{BackendKind, BackendRole};
