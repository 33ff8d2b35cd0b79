//! In-memory audit store for development and tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use audit_core::result::BackendResult;
use audit_entity::{AuditRecord, SearchFilter};

use crate::backend::StorageBackend;
use crate::query;

/// Process-local audit store guarded by a Tokio read/write lock.
///
/// Contents are lost on restart. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    /// Event id → record.
    records: Arc<RwLock<HashMap<String, AuditRecord>>>,
}

impl MemoryBackend {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns `true` when nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> bool {
        true
    }

    async fn put(&self, record: &AuditRecord) -> BackendResult<()> {
        let mut records = self.records.write().await;
        records.insert(record.event_id.clone(), record.clone());
        debug!(event_id = %record.event_id, "Stored audit record in memory");
        Ok(())
    }

    async fn get_by_id(&self, event_id: &str) -> BackendResult<Option<AuditRecord>> {
        Ok(self.records.read().await.get(event_id).cloned())
    }

    async fn query(&self, filter: &SearchFilter) -> BackendResult<Vec<AuditRecord>> {
        let snapshot: Vec<AuditRecord> = self.records.read().await.values().cloned().collect();
        Ok(query::evaluate(snapshot, filter))
    }

    async fn delete(&self, event_id: &str) -> BackendResult<u64> {
        let removed = self.records.write().await.remove(event_id);
        Ok(u64::from(removed.is_some()))
    }
}
