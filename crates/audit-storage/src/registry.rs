//! Backend registry: binds the searchable and archival roles to backends.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use audit_core::config::storage::StorageConfig;
use audit_core::error::AppError;
use audit_core::result::AppResult;
use audit_entity::{BackendKind, BackendRole};

use crate::backend::StorageBackend;
use crate::providers::MemoryBackend;

/// Holds one shared instance per backend kind and the role bindings.
///
/// Built once at startup and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct BackendRegistry {
    /// Backend kind → constructed instance.
    backends: HashMap<BackendKind, Arc<dyn StorageBackend>>,
    /// Role → backend kind it is bound to.
    bindings: HashMap<BackendRole, BackendKind>,
}

impl BackendRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry from configuration, constructing each distinct
    /// bound backend once.
    pub async fn from_config(config: &StorageConfig) -> AppResult<Self> {
        let searchable: BackendKind = config.searchable.parse()?;
        let archival: BackendKind = config.archival.parse()?;

        let mut registry = Self::new();
        for kind in [searchable, archival] {
            if !registry.backends.contains_key(&kind) {
                let backend = build_backend(kind, config).await?;
                registry.register(kind, backend);
            }
        }
        registry.bind(BackendRole::Searchable, searchable);
        registry.bind(BackendRole::Archival, archival);

        info!(%searchable, %archival, "Storage roles bound");
        Ok(registry)
    }

    /// Register (or replace) the instance for a backend kind.
    pub fn register(&mut self, kind: BackendKind, backend: Arc<dyn StorageBackend>) {
        self.backends.insert(kind, backend);
    }

    /// Bind a role to a backend kind.
    pub fn bind(&mut self, role: BackendRole, kind: BackendKind) {
        self.bindings.insert(role, kind);
    }

    /// Backend kind currently bound to `role`.
    pub fn binding(&self, role: BackendRole) -> Option<BackendKind> {
        self.bindings.get(&role).copied()
    }

    /// Return the shared backend serving `role`.
    pub fn resolve(&self, role: BackendRole) -> AppResult<Arc<dyn StorageBackend>> {
        let kind = self.binding(role).ok_or_else(|| {
            AppError::configuration(format!("No storage backend bound to the {role} role"))
        })?;
        self.backends.get(&kind).cloned().ok_or_else(|| {
            AppError::configuration(format!(
                "Storage backend '{kind}' bound to the {role} role is not registered"
            ))
        })
    }
}

async fn build_backend(
    kind: BackendKind,
    config: &StorageConfig,
) -> AppResult<Arc<dyn StorageBackend>> {
    match kind {
        BackendKind::Memory => Ok(Arc::new(MemoryBackend::new())),
        #[cfg(feature = "elasticsearch")]
        BackendKind::Elasticsearch => {
            let backend =
                crate::providers::ElasticsearchBackend::connect(&config.elasticsearch).await?;
            Ok(Arc::new(backend))
        }
        #[cfg(feature = "s3")]
        BackendKind::S3 => {
            let backend = crate::providers::S3Backend::connect(&config.s3).await?;
            Ok(Arc::new(backend))
        }
        #[allow(unreachable_patterns)]
        other => Err(AppError::configuration(format!(
            "Storage backend '{other}' is not compiled into this build"
        ))),
    }
}
