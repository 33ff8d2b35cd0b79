//! Shared test helpers for API integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use audit_api::{AppState, build_router};
use audit_auth::directory::BasicCredentials;
use audit_auth::password::{HashParams, PasswordHasher};
use audit_auth::{AccessPolicy, UserDirectory};
use audit_core::config::auth::UserEntry;
use audit_engine::AuditEngine;
use audit_storage::{MemoryBackend, StorageBackend};

/// Admin credentials.
pub const ADMIN: (&str, &str) = ("admin", "adminpass");
/// Regular user credentials.
pub const USER: (&str, &str) = ("user-001", "userpass");

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Searchable backend contents
    pub searchable: MemoryBackend,
    /// Archival backend contents
    pub archival: MemoryBackend,
}

impl TestApp {
    /// Create a new test application over empty memory backends
    pub fn new() -> Self {
        let searchable = MemoryBackend::new();
        let archival = MemoryBackend::new();
        let router = Self::router(Arc::new(searchable.clone()), Arc::new(archival.clone()));
        Self {
            router,
            searchable,
            archival,
        }
    }

    /// Build a router over arbitrary backends
    pub fn router(
        searchable: Arc<dyn StorageBackend>,
        archival: Arc<dyn StorageBackend>,
    ) -> Router {
        let hasher = PasswordHasher::with_params(HashParams::new(8, 1, 1, None).unwrap());
        let entries = [
            UserEntry {
                user_id: "admin123".into(),
                username: ADMIN.0.into(),
                password_hash: hasher.hash_password(ADMIN.1).unwrap(),
                roles: vec!["ROLE_ADMIN".into()],
            },
            UserEntry {
                user_id: "user-001".into(),
                username: USER.0.into(),
                password_hash: hasher.hash_password(USER.1).unwrap(),
                roles: vec!["ROLE_USER".into()],
            },
        ];
        let users = UserDirectory::with_hasher(entries, hasher);

        let engine = AuditEngine::new(searchable, archival, AccessPolicy::default());
        build_router(AppState::new(engine, users))
    }

    /// Ingest the two reference records: `12345` by admin123 and `67890` by user-001
    pub async fn seed(&self) {
        for (event_id, user_id) in [("12345", "admin123"), ("67890", "user-001")] {
            let response = self
                .request("POST", "/api/audit/logs", Some(record_body(event_id, user_id)), None)
                .await;
            assert_eq!(response.status, StatusCode::CREATED);
        }
    }

    /// Make a request against the router
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        credentials: Option<(&str, &str)>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();
        self.raw_request(method, path, body_str, credentials).await
    }

    /// Make a request with a raw body
    pub async fn raw_request(
        &self,
        method: &str,
        path: &str,
        body: String,
        credentials: Option<(&str, &str)>,
    ) -> TestResponse {
        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some((username, password)) = credentials {
            let header = BasicCredentials {
                username: username.into(),
                password: password.into(),
            }
            .to_header();
            req = req.header("Authorization", header);
        }

        let req = req.body(Body::from(body)).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// A minimal ingestion body
pub fn record_body(event_id: &str, user_id: &str) -> Value {
    serde_json::json!({
        "eventId": event_id,
        "timestamp": "2024-05-05T10:00:00Z",
        "sourceService": "user-service",
        "eventType": "UserUpdated",
        "entityType": "User",
        "entityId": "u-1",
        "changedBy": { "userId": user_id, "username": user_id, "roles": ["ROLE_USER"] },
        "changeSummary": { "email": { "oldValue": "a@x.io", "newValue": "b@x.io" } },
        "metadata": { "ipAddress": "10.0.0.1", "userAgent": "test" }
    })
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// Event ids in a list response
    pub fn event_ids(&self) -> Vec<String> {
        self.body
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item["eventId"].as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }
}
