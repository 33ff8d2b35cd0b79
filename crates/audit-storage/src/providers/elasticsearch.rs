//! Elasticsearch audit store over the REST API (requires `elasticsearch` feature).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use audit_core::config::storage::ElasticsearchConfig;
use audit_core::error::BackendError;
use audit_core::result::BackendResult;
use audit_entity::{AuditRecord, SearchFilter};

use crate::backend::StorageBackend;

const BACKEND: &str = "elasticsearch";

/// Elasticsearch-backed audit store. Each record is one document whose id
/// is the event id.
#[derive(Debug, Clone)]
pub struct ElasticsearchBackend {
    client: reqwest::Client,
    base_url: Url,
    index: String,
    credentials: Option<(String, String)>,
    refresh: bool,
}

#[derive(Debug, Deserialize)]
struct GetResponse {
    #[serde(default)]
    found: bool,
    #[serde(rename = "_source")]
    source: Option<AuditRecord>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_source")]
    source: AuditRecord,
}

#[derive(Debug, Deserialize)]
struct DeleteResponse {
    result: String,
}

impl ElasticsearchBackend {
    /// Build a client without touching the network.
    pub fn new(config: &ElasticsearchConfig) -> BackendResult<Self> {
        let base_url = Url::parse(&config.url).map_err(|e| {
            let message = format!("invalid url '{}'", config.url);
            BackendError::with_source(BACKEND, "connect", message, e)
        })?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::new(
                BACKEND,
                "connect",
                format!("url '{}' cannot carry a path", config.url),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                BackendError::with_source(BACKEND, "connect", "HTTP client init failed", e)
            })?;

        let credentials = (!config.username.is_empty())
            .then(|| (config.username.clone(), config.password.clone()));

        Ok(Self {
            client,
            base_url,
            index: config.index.clone(),
            credentials,
            refresh: config.refresh,
        })
    }

    /// Build a client and make sure the index exists with the audit mapping.
    pub async fn connect(config: &ElasticsearchConfig) -> BackendResult<Self> {
        let backend = Self::new(config)?;
        backend.ensure_index().await?;
        info!(url = %backend.base_url, index = %backend.index, "Elasticsearch backend ready");
        Ok(backend)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match self.credentials {
            Some((ref user, ref pass)) => builder.basic_auth(user, Some(pass)),
            None => builder,
        }
    }

    /// Appends `segments` to the base URL, percent-encoding each one so that
    /// `/`, `?`, `#` and `%` inside an event id stay part of that segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn doc_url(&self, event_id: &str) -> Url {
        self.url(&[self.index.as_str(), "_doc", event_id])
    }

    fn write_url(&self, event_id: &str) -> Url {
        let mut url = self.doc_url(event_id);
        if self.refresh {
            url.query_pairs_mut().append_pair("refresh", "wait_for");
        }
        url
    }

    async fn send(
        &self,
        operation: &'static str,
        builder: RequestBuilder,
    ) -> BackendResult<Response> {
        builder.send().await.map_err(|e| {
            let message = if e.is_timeout() {
                "request timed out".to_string()
            } else {
                format!("request failed: {e}")
            };
            BackendError::with_source(BACKEND, operation, message, e)
        })
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        operation: &'static str,
        response: Response,
    ) -> BackendResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| BackendError::with_source(BACKEND, operation, "invalid response body", e))
    }

    async fn status_error(operation: &'static str, response: Response) -> BackendError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        BackendError::new(BACKEND, operation, format!("HTTP {status}: {body}"))
    }

    /// Create the index with an explicit mapping if it does not exist yet.
    async fn ensure_index(&self) -> BackendResult<()> {
        let response = self
            .send(
                "ensure_index",
                self.request(Method::HEAD, self.url(&[self.index.as_str()])),
            )
            .await?;
        if response.status().is_success() {
            return Ok(());
        }
        if response.status() != StatusCode::NOT_FOUND {
            return Err(Self::status_error("ensure_index", response).await);
        }

        let response = self
            .send(
                "ensure_index",
                self.request(Method::PUT, self.url(&[self.index.as_str()]))
                    .json(&json!({ "mappings": index_mapping() })),
            )
            .await?;

        if response.status().is_success() {
            info!(index = %self.index, "Created audit index");
            return Ok(());
        }

        // Another instance may have created the index in between.
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::BAD_REQUEST && body.contains("resource_already_exists_exception") {
            return Ok(());
        }
        Err(BackendError::new(
            BACKEND,
            "ensure_index",
            format!("HTTP {status}: {body}"),
        ))
    }
}

#[async_trait]
impl StorageBackend for ElasticsearchBackend {
    fn name(&self) -> &str {
        BACKEND
    }

    async fn health_check(&self) -> bool {
        let url = self.url(&["_cluster", "health"]);
        match self.request(Method::GET, url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn put(&self, record: &AuditRecord) -> BackendResult<()> {
        let url = self.write_url(&record.event_id);
        let response = self
            .send("put", self.request(Method::PUT, url).json(record))
            .await?;
        if !response.status().is_success() {
            return Err(Self::status_error("put", response).await);
        }
        debug!(event_id = %record.event_id, index = %self.index, "Indexed audit record");
        Ok(())
    }

    async fn get_by_id(&self, event_id: &str) -> BackendResult<Option<AuditRecord>> {
        let response = self
            .send(
                "get_by_id",
                self.request(Method::GET, self.doc_url(event_id)),
            )
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::status_error("get_by_id", response).await);
        }

        let body: GetResponse = Self::parse("get_by_id", response).await?;
        Ok(if body.found { body.source } else { None })
    }

    async fn query(&self, filter: &SearchFilter) -> BackendResult<Vec<AuditRecord>> {
        let url = self.url(&[self.index.as_str(), "_search"]);
        let response = self
            .send(
                "query",
                self.request(Method::POST, url).json(&search_body(filter)),
            )
            .await?;
        if !response.status().is_success() {
            return Err(Self::status_error("query", response).await);
        }

        let body: SearchResponse = Self::parse("query", response).await?;
        Ok(body.hits.hits.into_iter().map(|hit| hit.source).collect())
    }

    async fn delete(&self, event_id: &str) -> BackendResult<u64> {
        let url = self.write_url(event_id);
        let response = self
            .send("delete", self.request(Method::DELETE, url))
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(0);
        }
        if !response.status().is_success() {
            return Err(Self::status_error("delete", response).await);
        }

        let body: DeleteResponse = Self::parse("delete", response).await?;
        Ok(u64::from(body.result == "deleted"))
    }
}

/// Index mapping: exact-match keywords, a date timestamp, and an opaque
/// change summary.
fn index_mapping() -> Value {
    json!({
        "properties": {
            "eventId": { "type": "keyword" },
            "timestamp": { "type": "date" },
            "sourceService": { "type": "keyword" },
            "eventType": { "type": "keyword" },
            "entityType": { "type": "keyword" },
            "entityId": { "type": "keyword" },
            "changedBy": {
                "properties": {
                    "userId": { "type": "keyword" },
                    "username": { "type": "keyword" },
                    "roles": { "type": "keyword" }
                }
            },
            "changeSummary": { "type": "object", "enabled": false },
            "metadata": {
                "properties": {
                    "ipAddress": { "type": "keyword" },
                    "userAgent": { "type": "keyword" }
                }
            }
        }
    })
}

/// Translate a filter into a `_search` request body.
fn search_body(filter: &SearchFilter) -> Value {
    let terms = [
        ("eventId", &filter.event_id),
        ("sourceService", &filter.source_service),
        ("eventType", &filter.event_type),
        ("entityType", &filter.entity_type),
        ("entityId", &filter.entity_id),
        ("changedBy.userId", &filter.changed_by_user_id),
    ];

    let mut clauses: Vec<Value> = terms
        .into_iter()
        .filter_map(|(field, value)| value.as_ref().map(|v| json!({ "term": { field: v } })))
        .collect();

    if filter.start_time.is_some() || filter.end_time.is_some() {
        let mut range = serde_json::Map::new();
        if let Some(start) = filter.start_time {
            range.insert("gte".into(), json!(start.to_rfc3339()));
        }
        if let Some(end) = filter.end_time {
            range.insert("lte".into(), json!(end.to_rfc3339()));
        }
        clauses.push(json!({ "range": { "timestamp": range } }));
    }

    let page = filter.page_request();
    let order = filter.sort_direction().as_str();
    json!({
        "query": { "bool": { "filter": clauses } },
        "from": page.offset(),
        "size": page.limit(),
        "sort": [
            { "timestamp": { "order": order } },
            { "eventId": { "order": "asc" } }
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use audit_core::types::{PageRequest, SortDirection};
    use chrono::{TimeZone, Utc};

    #[test]
    fn empty_filter_has_no_clauses() {
        let body = search_body(&SearchFilter::default());
        assert_eq!(body["query"]["bool"]["filter"], json!([]));
        assert_eq!(body["from"], 0);
        assert_eq!(body["size"], 10);
        assert_eq!(body["sort"][0]["timestamp"]["order"], "asc");
        assert_eq!(body["sort"][1]["eventId"]["order"], "asc");
    }

    #[test]
    fn set_fields_become_term_clauses() {
        let filter = SearchFilter {
            changed_by_user_id: Some("user-001".into()),
            event_type: Some("UserCreated".into()),
            sort: Some(SortDirection::Desc),
            ..SearchFilter::paged(PageRequest::new(2, 25))
        };
        let body = search_body(&filter);
        let clauses = body["query"]["bool"]["filter"].as_array().unwrap();

        assert_eq!(clauses.len(), 2);
        assert!(clauses.contains(&json!({ "term": { "eventType": "UserCreated" } })));
        assert!(clauses.contains(&json!({ "term": { "changedBy.userId": "user-001" } })));
        assert_eq!(body["from"], 50);
        assert_eq!(body["size"], 25);
        assert_eq!(body["sort"][0]["timestamp"]["order"], "desc");
    }

    #[test]
    fn time_bounds_become_inclusive_range() {
        let filter = SearchFilter {
            start_time: Some(Utc.with_ymd_and_hms(2024, 5, 5, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        let body = search_body(&filter);
        let range = &body["query"]["bool"]["filter"][0]["range"]["timestamp"];
        assert!(range["gte"].as_str().unwrap().starts_with("2024-05-05T00:00:00"));
        assert!(range.get("lte").is_none());
    }

    #[test]
    fn change_summary_is_not_indexed() {
        let mapping = index_mapping();
        assert_eq!(mapping["properties"]["changeSummary"]["enabled"], false);
        assert_eq!(mapping["properties"]["timestamp"]["type"], "date");
    }

    #[test]
    fn credentials_are_optional() {
        let backend = ElasticsearchBackend::new(&ElasticsearchConfig::default()).unwrap();
        assert!(backend.credentials.is_none());
        assert_eq!(backend.doc_url("42").path(), "/audit-logs/_doc/42");
        assert_eq!(backend.write_url("42").query(), None);

        let config = ElasticsearchConfig {
            url: "http://es:9200/".into(),
            username: "elastic".into(),
            password: "secret".into(),
            refresh: true,
            ..Default::default()
        };
        let backend = ElasticsearchBackend::new(&config).unwrap();
        assert_eq!(
            backend.write_url("42").as_str(),
            "http://es:9200/audit-logs/_doc/42?refresh=wait_for"
        );
        assert!(backend.credentials.is_some());
    }

    #[test]
    fn event_ids_are_encoded_as_one_segment() {
        let backend = ElasticsearchBackend::new(&ElasticsearchConfig::default()).unwrap();

        let cases = [
            ("user/42", "/audit-logs/_doc/user%2F42"),
            ("a#frag", "/audit-logs/_doc/a%23frag"),
            ("x?y=1", "/audit-logs/_doc/x%3Fy=1"),
            ("100%", "/audit-logs/_doc/100%25"),
        ];
        for (event_id, path) in cases {
            let url = backend.doc_url(event_id);
            assert_eq!(url.path(), path, "event id {event_id:?}");
            assert_eq!(url.query(), None);
            assert_eq!(url.fragment(), None);
        }
    }

    #[test]
    fn base_path_is_preserved() {
        let config = ElasticsearchConfig {
            url: "http://proxy:8080/es/".into(),
            ..Default::default()
        };
        let backend = ElasticsearchBackend::new(&config).unwrap();
        assert_eq!(backend.doc_url("42").path(), "/es/audit-logs/_doc/42");
        assert_eq!(backend.url(&["_cluster", "health"]).path(), "/es/_cluster/health");
    }

    #[test]
    fn unusable_url_is_rejected() {
        for url in ["not a url", "mailto:ops@example.com"] {
            let config = ElasticsearchConfig {
                url: url.into(),
                ..Default::default()
            };
            assert!(ElasticsearchBackend::new(&config).is_err());
        }
    }
}
