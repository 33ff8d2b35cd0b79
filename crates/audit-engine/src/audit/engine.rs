//! Audit engine: dual-write ingestion and policy-checked reads and deletes.

use std::sync::Arc;

use tracing::{debug, error, info, warn};
use validator::Validate;

use audit_auth::AccessPolicy;
use audit_core::error::{AppError, ErrorKind};
use audit_core::result::AppResult;
use audit_core::types::PageRequest;
use audit_entity::{AuditRecord, BackendRole, CallerIdentity, DeletionOutcome, SearchFilter};
use audit_storage::{BackendRegistry, StorageBackend};

use super::health::{BackendHealth, HealthReport};

/// Stateless orchestrator over the searchable and archival backends.
#[derive(Debug, Clone)]
pub struct AuditEngine {
    /// Backend serving lookups, searches and deletes.
    searchable: Arc<dyn StorageBackend>,
    /// Backend holding the retention copy.
    archival: Arc<dyn StorageBackend>,
    /// Access rules.
    policy: AccessPolicy,
}

impl AuditEngine {
    /// Creates an engine over explicit backends.
    pub fn new(
        searchable: Arc<dyn StorageBackend>,
        archival: Arc<dyn StorageBackend>,
        policy: AccessPolicy,
    ) -> Self {
        Self {
            searchable,
            archival,
            policy,
        }
    }

    /// Creates an engine from the backends bound in `registry`.
    pub fn from_registry(registry: &BackendRegistry, policy: AccessPolicy) -> AppResult<Self> {
        Ok(Self::new(
            registry.resolve(BackendRole::Searchable)?,
            registry.resolve(BackendRole::Archival)?,
            policy,
        ))
    }

    /// Returns the access policy in force.
    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Stores a record in both backends and returns its event id.
    ///
    /// Both writes run concurrently and both outcomes are collected. If only
    /// one of them fails the error is `PartialWrite`, naming which role holds
    /// the record, so operators can reconcile.
    pub async fn record(&self, record: AuditRecord) -> AppResult<String> {
        let record = record.with_assigned_id();
        record
            .validate()
            .map_err(|e| AppError::validation(format!("Invalid audit record: {e}")))?;

        let event_id = record.event_id.clone();
        let (archived, indexed) =
            tokio::join!(self.archival.put(&record), self.searchable.put(&record));

        match (archived, indexed) {
            (Ok(()), Ok(())) => {
                info!(
                    event_id = %event_id,
                    user_id = %record.changed_by.user_id,
                    event_type = %record.event_type,
                    "Audit record stored"
                );
                Ok(event_id)
            }
            (Err(e), Ok(())) => {
                warn!(
                    event_id = %event_id,
                    backend = %self.archival.name(),
                    error = %e,
                    "Archival write failed; searchable copy stored"
                );
                Err(AppError::partial_write(
                    format!(
                        "Audit log {event_id} was stored in the searchable backend '{}' but the archival backend '{}' failed",
                        self.searchable.name(),
                        self.archival.name()
                    ),
                    e,
                ))
            }
            (Ok(()), Err(e)) => {
                warn!(
                    event_id = %event_id,
                    backend = %self.searchable.name(),
                    error = %e,
                    "Searchable write failed; archival copy stored"
                );
                Err(AppError::partial_write(
                    format!(
                        "Audit log {event_id} was stored in the archival backend '{}' but the searchable backend '{}' failed",
                        self.archival.name(),
                        self.searchable.name()
                    ),
                    e,
                ))
            }
            (Err(archival_err), Err(searchable_err)) => {
                error!(
                    event_id = %event_id,
                    archival_error = %archival_err,
                    searchable_error = %searchable_err,
                    "Audit record could not be stored"
                );
                Err(AppError::with_source(
                    ErrorKind::Backend,
                    format!(
                        "Audit log {event_id} could not be stored: {archival_err}; {searchable_err}"
                    ),
                    searchable_err,
                ))
            }
        }
    }

    /// Lists one page of records visible to the caller.
    pub async fn get_all(
        &self,
        caller: Option<&CallerIdentity>,
        page: PageRequest,
    ) -> AppResult<Vec<AuditRecord>> {
        self.advanced_search(caller, SearchFilter::paged(page)).await
    }

    /// Lists one page of records authored by `user_id`.
    pub async fn get_by_user(
        &self,
        caller: Option<&CallerIdentity>,
        user_id: &str,
        page: PageRequest,
    ) -> AppResult<Vec<AuditRecord>> {
        self.advanced_search(caller, SearchFilter::for_user(user_id, page))
            .await
    }

    /// Fetches a single record. Records hidden from the caller read as absent.
    pub async fn get_by_id(
        &self,
        caller: Option<&CallerIdentity>,
        event_id: &str,
    ) -> AppResult<Option<AuditRecord>> {
        self.policy.authenticate(caller).into_result()?;

        let found = self.searchable.get_by_id(event_id).await?;
        let visible = self.policy.authorize_read(caller, found).into_result()?;

        if visible.is_none() {
            debug!(event_id, "Audit log not found or not visible to caller");
        }
        Ok(visible)
    }

    /// Runs a search after validating the filter and applying the policy.
    pub async fn advanced_search(
        &self,
        caller: Option<&CallerIdentity>,
        filter: SearchFilter,
    ) -> AppResult<Vec<AuditRecord>> {
        filter
            .validate()
            .map_err(|e| AppError::validation(format!("Invalid search filter: {e}")))?;

        let filter = match self.policy.authorize_search(caller, filter).into_result() {
            Ok(filter) => filter,
            Err(e) => {
                warn!(
                    caller = caller.map(|c| c.user_id.as_str()).unwrap_or("anonymous"),
                    error = %e,
                    "Search refused"
                );
                return Err(e);
            }
        };

        if let Some(caller) = caller
            && !self.policy.is_admin(caller)
        {
            debug!(user_id = %caller.user_id, "Search scoped to caller's own records");
        }

        let records = self.searchable.query(&filter).await?;
        debug!(
            caller = caller.map(|c| c.user_id.as_str()).unwrap_or("anonymous"),
            count = records.len(),
            page = filter.page,
            size = filter.size,
            "Search completed"
        );
        Ok(records)
    }

    /// Deletes a record from the searchable backend. The archival copy is kept.
    ///
    /// Non-admins may only delete records they authored. Backend failures are
    /// reported as [`DeletionOutcome::Failure`]; refusals as errors.
    pub async fn delete_by_id(
        &self,
        caller: Option<&CallerIdentity>,
        event_id: &str,
    ) -> AppResult<DeletionOutcome> {
        let caller = self.policy.authenticate(caller).into_result()?;

        if self.policy.requires_ownership_check(caller) {
            let record = match self.searchable.get_by_id(event_id).await {
                Ok(Some(record)) => record,
                Ok(None) => return Ok(DeletionOutcome::not_found(event_id)),
                Err(e) => {
                    error!(event_id, error = %e, "Lookup before delete failed");
                    return Ok(DeletionOutcome::Failure {
                        reason: e.to_string(),
                    });
                }
            };

            if let Err(e) = self.policy.authorize_delete(caller, &record).into_result() {
                warn!(
                    event_id,
                    caller = %caller.user_id,
                    owner = %record.changed_by.user_id,
                    "Delete refused"
                );
                return Err(e);
            }
        }

        match self.searchable.delete(event_id).await {
            Ok(0) => Ok(DeletionOutcome::not_found(event_id)),
            Ok(deleted_count) => {
                info!(event_id, caller = %caller.user_id, "Audit log deleted");
                Ok(DeletionOutcome::Success { deleted_count })
            }
            Err(e) => {
                error!(event_id, error = %e, "Delete failed");
                Ok(DeletionOutcome::Failure {
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Probes both backends concurrently.
    pub async fn health(&self) -> HealthReport {
        let (searchable, archival) = tokio::join!(
            self.searchable.health_check(),
            self.archival.health_check()
        );
        HealthReport::new(vec![
            BackendHealth {
                role: BackendRole::Searchable,
                backend: self.searchable.name().to_string(),
                healthy: searchable,
            },
            BackendHealth {
                role: BackendRole::Archival,
                backend: self.archival.name().to_string(),
                healthy: archival,
            },
        ])
    }
}
