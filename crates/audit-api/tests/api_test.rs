//! Integration tests for the audit HTTP API.

mod helpers;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;

use audit_core::error::BackendError;
use audit_core::result::BackendResult;
use audit_entity::{AuditRecord, SearchFilter};
use audit_storage::{MemoryBackend, StorageBackend};

use helpers::{ADMIN, TestApp, USER, record_body};

/// Backend that is always unreachable.
#[derive(Debug)]
struct DownBackend;

#[async_trait]
impl StorageBackend for DownBackend {
    fn name(&self) -> &str {
        "down"
    }

    async fn health_check(&self) -> bool {
        false
    }

    async fn put(&self, _record: &AuditRecord) -> BackendResult<()> {
        Err(BackendError::new("down", "put", "unreachable"))
    }

    async fn get_by_id(&self, _event_id: &str) -> BackendResult<Option<AuditRecord>> {
        Err(BackendError::new("down", "get_by_id", "unreachable"))
    }

    async fn query(&self, _filter: &SearchFilter) -> BackendResult<Vec<AuditRecord>> {
        Err(BackendError::new("down", "query", "unreachable"))
    }

    async fn delete(&self, _event_id: &str) -> BackendResult<u64> {
        Err(BackendError::new("down", "delete", "unreachable"))
    }
}

#[tokio::test]
async fn test_ingest_returns_created() {
    let app = TestApp::new();

    let response = app
        .request("POST", "/api/audit/logs", Some(record_body("12345", "admin123")), None)
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["eventId"], "12345");
    assert!(app.searchable.get_by_id("12345").await.unwrap().is_some());
    assert!(app.archival.get_by_id("12345").await.unwrap().is_some());
}

#[tokio::test]
async fn test_ingest_rejects_malformed_body() {
    let app = TestApp::new();

    let response = app
        .raw_request("POST", "/api/audit/logs", "{ not json".into(), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION");

    let response = app
        .request("POST", "/api/audit/logs", Some(record_body("1", "")), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ingest_partial_write_is_server_error() {
    let searchable = MemoryBackend::new();
    let router = TestApp::router(Arc::new(searchable.clone()), Arc::new(DownBackend));
    let app = TestApp {
        router,
        searchable,
        archival: MemoryBackend::new(),
    };

    let response = app
        .request("POST", "/api/audit/logs", Some(record_body("e-1", "user-001")), None)
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "PARTIAL_WRITE");

    let response = app
        .request("GET", "/api/audit/logs/event/e-1", None, Some(ADMIN))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_ingest_total_failure_is_bad_gateway() {
    let router = TestApp::router(Arc::new(DownBackend), Arc::new(DownBackend));
    let app = TestApp {
        router,
        searchable: MemoryBackend::new(),
        archival: MemoryBackend::new(),
    };

    let response = app
        .request("POST", "/api/audit/logs", Some(record_body("e-1", "user-001")), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.body["error"], "BACKEND");
}

#[tokio::test]
async fn test_list_requires_authentication() {
    let app = TestApp::new();
    app.seed().await;

    let response = app.request("GET", "/api/audit/logs", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request("GET", "/api/audit/logs", None, Some(("admin", "wrong")))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_is_scoped_for_non_admin() {
    let app = TestApp::new();
    app.seed().await;

    let response = app.request("GET", "/api/audit/logs", None, Some(USER)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.event_ids(), vec!["67890"]);

    let response = app
        .request("GET", "/api/audit/logs?page=0&size=10", None, Some(ADMIN))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.event_ids().len(), 2);
}

#[tokio::test]
async fn test_list_rejects_zero_size() {
    let app = TestApp::new();

    let response = app
        .request("GET", "/api/audit/logs?size=0", None, Some(ADMIN))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_rejects_malformed_paging_with_json_body() {
    let app = TestApp::new();

    for path in [
        "/api/audit/logs?size=abc",
        "/api/audit/logs?page=-1",
        "/api/audit/logs/user/user-001?size=abc",
    ] {
        let response = app.request("GET", path, None, Some(ADMIN)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{path}");
        assert_eq!(response.body["error"], "VALIDATION", "{path}");
        assert!(response.body["message"].is_string(), "{path}");
    }
}

#[tokio::test]
async fn test_pages_past_result_window_are_validation_errors() {
    let app = TestApp::new();
    app.seed().await;

    let response = app
        .request("GET", "/api/audit/logs?page=10&size=1000", None, Some(ADMIN))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION");

    let deep = serde_json::json!({ "page": 1000, "size": 10 });
    let response = app
        .request("POST", "/api/audit/query", Some(deep), Some(ADMIN))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let last = serde_json::json!({ "page": 999, "size": 10 });
    let response = app
        .request("POST", "/api/audit/query", Some(last), Some(ADMIN))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.event_ids().is_empty());
}

#[tokio::test]
async fn test_logs_by_user() {
    let app = TestApp::new();
    app.seed().await;

    let response = app
        .request("GET", "/api/audit/logs/user/user-001", None, Some(USER))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.event_ids(), vec!["67890"]);

    let response = app
        .request("GET", "/api/audit/logs/user/admin123", None, Some(USER))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "ACCESS_DENIED");

    let response = app
        .request("GET", "/api/audit/logs/user/admin123", None, Some(ADMIN))
        .await;
    assert_eq!(response.event_ids(), vec!["12345"]);
}

#[tokio::test]
async fn test_log_by_event_hides_foreign_records() {
    let app = TestApp::new();
    app.seed().await;

    let response = app
        .request("GET", "/api/audit/logs/event/12345", None, Some(USER))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request("GET", "/api/audit/logs/event/67890", None, Some(USER))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["changedBy"]["userId"], "user-001");
    assert_eq!(response.body["changeSummary"]["email"]["newValue"], "b@x.io");

    for id in ["12345", "67890"] {
        let response = app
            .request("GET", &format!("/api/audit/logs/event/{id}"), None, Some(ADMIN))
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let response = app
        .request("GET", "/api/audit/logs/event/67890", None, None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_query_by_post_and_get() {
    let app = TestApp::new();
    app.seed().await;

    let filter = serde_json::json!({ "sourceService": "user-service", "sort": "desc" });
    let response = app
        .request("POST", "/api/audit/query", Some(filter.clone()), Some(ADMIN))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.event_ids().len(), 2);

    let response = app
        .request("GET", "/api/audit/query", Some(filter), Some(USER))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.event_ids(), vec!["67890"]);

    let response = app
        .raw_request("GET", "/api/audit/query", String::new(), Some(ADMIN))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.event_ids().len(), 2);
}

#[tokio::test]
async fn test_query_rejections() {
    let app = TestApp::new();
    app.seed().await;

    let foreign = serde_json::json!({ "changedByUserId": "admin123" });
    let response = app
        .request("POST", "/api/audit/query", Some(foreign.clone()), Some(USER))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request("POST", "/api/audit/query", Some(foreign), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let inverted = serde_json::json!({
        "startTime": "2024-05-06T00:00:00Z",
        "endTime": "2024-05-05T00:00:00Z"
    });
    let response = app
        .request("POST", "/api/audit/query", Some(inverted), Some(ADMIN))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_flow() {
    let app = TestApp::new();
    app.seed().await;

    let response = app
        .request("DELETE", "/api/audit/logs/event/12345", None, Some(USER))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request("DELETE", "/api/audit/logs/event/missing", None, Some(USER))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request("DELETE", "/api/audit/logs/event/67890", None, Some(USER))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "SUCCESS");
    assert_eq!(response.body["deletedCount"], 1);
    assert!(app.archival.get_by_id("67890").await.unwrap().is_some());

    let response = app
        .request("DELETE", "/api/audit/logs/event/12345", None, Some(ADMIN))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("DELETE", "/api/audit/logs/event/12345", None, None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_backend_failure() {
    let router = TestApp::router(Arc::new(DownBackend), Arc::new(MemoryBackend::new()));
    let app = TestApp {
        router,
        searchable: MemoryBackend::new(),
        archival: MemoryBackend::new(),
    };

    let response = app
        .request("DELETE", "/api/audit/logs/event/e-1", None, Some(ADMIN))
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "DELETION_FAILED");
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "UP");
    assert_eq!(response.body["backends"][0]["role"], "searchable");

    let router = TestApp::router(Arc::new(MemoryBackend::new()), Arc::new(DownBackend));
    let app = TestApp {
        router,
        searchable: MemoryBackend::new(),
        archival: MemoryBackend::new(),
    };
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["status"], "DOWN");
}
