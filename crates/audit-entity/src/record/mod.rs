//! Audit record entities.

pub mod model;

pub use model::{AuditRecord, ChangeDetail, ChangedBy, RecordMetadata};
