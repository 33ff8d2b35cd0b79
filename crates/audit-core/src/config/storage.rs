//! Storage backend configuration.

use serde::{Deserialize, Serialize};

/// Top-level storage configuration.
///
/// `searchable` and `archival` bind the two logical roles to backend names;
/// the remaining sections hold connection settings per backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend serving searches and lookups.
    #[serde(default = "default_searchable")]
    pub searchable: String,
    /// Backend holding the long-term archival copy.
    #[serde(default = "default_archival")]
    pub archival: String,
    /// Elasticsearch connection settings.
    #[serde(default)]
    pub elasticsearch: ElasticsearchConfig,
    /// S3-compatible object storage settings.
    #[serde(default)]
    pub s3: S3StorageConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            searchable: default_searchable(),
            archival: default_archival(),
            elasticsearch: ElasticsearchConfig::default(),
            s3: S3StorageConfig::default(),
        }
    }
}

/// Elasticsearch connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElasticsearchConfig {
    /// Base URL of the cluster.
    #[serde(default = "default_es_url")]
    pub url: String,
    /// Index holding audit documents.
    #[serde(default = "default_es_index")]
    pub index: String,
    /// Basic auth user name (empty disables auth).
    #[serde(default)]
    pub username: String,
    /// Basic auth password.
    #[serde(default)]
    pub password: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Wait for the index to refresh after writes so they are searchable immediately.
    #[serde(default)]
    pub refresh: bool,
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        Self {
            url: default_es_url(),
            index: default_es_index(),
            username: String::new(),
            password: String::new(),
            timeout_seconds: default_timeout(),
            refresh: false,
        }
    }
}

/// S3-compatible object storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3StorageConfig {
    /// S3 endpoint URL (for non-AWS services like MinIO). Empty uses AWS.
    #[serde(default)]
    pub endpoint: String,
    /// AWS region.
    #[serde(default = "default_region")]
    pub region: String,
    /// S3 bucket name. The bucket must already exist.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Key prefix under which records are stored.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Access key ID (empty uses the default credential chain).
    #[serde(default)]
    pub access_key: String,
    /// Secret access key.
    #[serde(default)]
    pub secret_key: String,
    /// Use path-style addressing (required by MinIO).
    #[serde(default = "default_true")]
    pub path_style_access: bool,
    /// Per-operation timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Maximum number of objects fetched in parallel while scanning.
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,
}

impl Default for S3StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            region: default_region(),
            bucket: default_bucket(),
            prefix: default_prefix(),
            access_key: String::new(),
            secret_key: String::new(),
            path_style_access: true,
            timeout_seconds: default_timeout(),
            fetch_concurrency: default_fetch_concurrency(),
        }
    }
}

fn default_searchable() -> String {
    "elasticsearch".to_string()
}

fn default_archival() -> String {
    "s3".to_string()
}

fn default_es_url() -> String {
    "http://localhost:9200".to_string()
}

fn default_es_index() -> String {
    "audit-logs".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_bucket() -> String {
    "audit-logs".to_string()
}

fn default_prefix() -> String {
    "logs/".to_string()
}

fn default_true() -> bool {
    true
}

fn default_fetch_concurrency() -> usize {
    16
}
