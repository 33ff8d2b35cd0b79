//! S3-compatible audit archive (requires `s3` feature).

use std::time::Duration;

use async_trait::async_trait;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};

use audit_core::config::storage::S3StorageConfig;
use audit_core::error::BackendError;
use audit_core::result::BackendResult;
use audit_entity::{AuditRecord, SearchFilter};

use crate::backend::StorageBackend;
use crate::query;

const BACKEND: &str = "s3";
const OBJECT_SUFFIX: &str = ".json";

/// S3-compatible audit store. Each record is one JSON object at
/// `{prefix}{eventId}.json`.
///
/// Queries list every object under the prefix and evaluate the filter in
/// memory, so they scale with the archive size.
#[derive(Debug, Clone)]
pub struct S3Backend {
    client: Client,
    bucket: String,
    prefix: String,
    fetch_concurrency: usize,
}

impl S3Backend {
    /// Create a client for the configured endpoint and bucket.
    pub async fn connect(config: &S3StorageConfig) -> BackendResult<Self> {
        let timeouts = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(config.timeout_seconds))
            .build();

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .timeout_config(timeouts);
        if !config.access_key.is_empty() {
            loader = loader.credentials_provider(Credentials::new(
                config.access_key.clone(),
                config.secret_key.clone(),
                None,
                None,
                "static",
            ));
        }
        let shared = loader.load().await;

        let mut builder =
            aws_sdk_s3::config::Builder::from(&shared).force_path_style(config.path_style_access);
        if !config.endpoint.is_empty() {
            builder = builder.endpoint_url(&config.endpoint);
        }

        info!(
            endpoint = %config.endpoint,
            region = %config.region,
            bucket = %config.bucket,
            "Initializing S3 audit backend"
        );

        Ok(Self::with_client(Client::from_conf(builder.build()), config))
    }

    /// Wrap an existing client.
    pub fn with_client(client: Client, config: &S3StorageConfig) -> Self {
        Self {
            client,
            bucket: config.bucket.clone(),
            prefix: config.prefix.clone(),
            fetch_concurrency: config.fetch_concurrency.max(1),
        }
    }

    fn object_key(&self, event_id: &str) -> String {
        format!("{}{}{}", self.prefix, event_id, OBJECT_SUFFIX)
    }

    fn is_record_key(&self, key: &str) -> bool {
        key.starts_with(&self.prefix) && key.ends_with(OBJECT_SUFFIX)
    }

    async fn fetch(&self, key: &str) -> BackendResult<Option<AuditRecord>> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) if e.as_service_error().is_some_and(|se| se.is_no_such_key()) => {
                return Ok(None);
            }
            Err(e) => return Err(sdk_error("get_by_id", key, e)),
        };

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| {
                BackendError::with_source(BACKEND, "get_by_id", format!("failed to read {key}"), e)
            })?
            .into_bytes();

        let record = serde_json::from_slice(&bytes).map_err(|e| {
            BackendError::with_source(BACKEND, "get_by_id", format!("invalid record at {key}"), e)
        })?;
        Ok(Some(record))
    }

    async fn list_keys(&self) -> BackendResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(&self.prefix)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| sdk_error("query", &self.prefix, e))?;
            keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|object| object.key())
                    .filter(|key| self.is_record_key(key))
                    .map(str::to_string),
            );
        }
        Ok(keys)
    }
}

fn sdk_error<E>(operation: &'static str, key: &str, err: E) -> BackendError
where
    E: std::error::Error + Send + Sync + 'static,
{
    let message = format!("{key}: {}", DisplayErrorContext(&err));
    BackendError::with_source(BACKEND, operation, message, err)
}

#[async_trait]
impl StorageBackend for S3Backend {
    fn name(&self) -> &str {
        BACKEND
    }

    async fn health_check(&self) -> bool {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .is_ok()
    }

    async fn put(&self, record: &AuditRecord) -> BackendResult<()> {
        let key = self.object_key(&record.event_id);
        let body = serde_json::to_vec(record)
            .map_err(|e| BackendError::with_source(BACKEND, "put", "failed to encode record", e))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type("application/json")
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| sdk_error("put", &key, e))?;

        debug!(key = %key, "Archived audit record");
        Ok(())
    }

    async fn get_by_id(&self, event_id: &str) -> BackendResult<Option<AuditRecord>> {
        self.fetch(&self.object_key(event_id)).await
    }

    async fn query(&self, filter: &SearchFilter) -> BackendResult<Vec<AuditRecord>> {
        if let Some(ref event_id) = filter.event_id {
            let found = self.get_by_id(event_id).await?;
            return Ok(query::evaluate(found, filter));
        }

        let keys = self.list_keys().await?;
        let records: Vec<Option<AuditRecord>> = stream::iter(keys)
            .map(|key| async move { self.fetch(&key).await })
            .buffer_unordered(self.fetch_concurrency)
            .try_collect()
            .await?;

        debug!(scanned = records.len(), "Evaluated S3 query in memory");
        Ok(query::evaluate(records.into_iter().flatten(), filter))
    }

    async fn delete(&self, event_id: &str) -> BackendResult<u64> {
        let key = self.object_key(event_id);

        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
        {
            Ok(_) => {}
            Err(e) if e.as_service_error().is_some_and(|se| se.is_not_found()) => return Ok(0),
            Err(e) => return Err(sdk_error("delete", &key, e)),
        }

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| sdk_error("delete", &key, e))?;

        debug!(key = %key, "Deleted archived audit record");
        Ok(1)
    }
}
