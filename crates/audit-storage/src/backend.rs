//! Storage backend trait for pluggable audit record stores.

use async_trait::async_trait;

use audit_core::result::BackendResult;
use audit_entity::{AuditRecord, SearchFilter};

/// Trait for audit record stores.
///
/// Implementations exist for Elasticsearch, S3-compatible object storage,
/// and a process-local map. Records are keyed by `eventId`; writing the
/// same id twice overwrites the earlier copy.
#[async_trait]
pub trait StorageBackend: Send + Sync + std::fmt::Debug + 'static {
    /// Return the backend identity (e.g., "elasticsearch", "s3").
    fn name(&self) -> &str;

    /// Check whether the backend is reachable.
    async fn health_check(&self) -> bool;

    /// Persist a record, replacing any record with the same event id.
    async fn put(&self, record: &AuditRecord) -> BackendResult<()>;

    /// Fetch a record by event id. A missing record is `Ok(None)`.
    async fn get_by_id(&self, event_id: &str) -> BackendResult<Option<AuditRecord>>;

    /// Return the requested page of records matching every set filter field,
    /// ordered by timestamp then event id.
    async fn query(&self, filter: &SearchFilter) -> BackendResult<Vec<AuditRecord>>;

    /// Remove a record by event id, returning how many were removed (0 or 1).
    async fn delete(&self, event_id: &str) -> BackendResult<u64>;
}
