//! Audit log handlers.

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use audit_core::error::AppError;
use audit_core::types::PageRequest;
use audit_entity::{AuditRecord, DeletionOutcome, SearchFilter};

use crate::error::{ApiError, ApiErrorResponse};
use crate::extractors::{Caller, PaginationParams};
use crate::state::AppState;

/// POST /api/audit/logs
pub async fn create_log(
    State(state): State<AppState>,
    payload: Result<Json<AuditRecord>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let Json(record) = payload.map_err(|e| {
        AppError::validation(format!("Invalid audit log body: {}", e.body_text()))
    })?;

    let event_id = state.engine.record(record).await?;
    Ok((StatusCode::CREATED, Json(json!({ "eventId": event_id }))))
}

/// GET /api/audit/logs
pub async fn list_logs(
    State(state): State<AppState>,
    caller: Caller,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<Vec<AuditRecord>>, ApiError> {
    let page = page_request(params)?;
    let records = state.engine.get_all(caller.identity(), page).await?;
    Ok(Json(records))
}

/// GET /api/audit/logs/user/{userId}
pub async fn logs_by_user(
    State(state): State<AppState>,
    caller: Caller,
    Path(user_id): Path<String>,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<Vec<AuditRecord>>, ApiError> {
    let page = page_request(params)?;
    let records = state
        .engine
        .get_by_user(caller.identity(), &user_id, page)
        .await?;
    Ok(Json(records))
}

/// GET /api/audit/logs/event/{eventId}
pub async fn log_by_event(
    State(state): State<AppState>,
    caller: Caller,
    Path(event_id): Path<String>,
) -> Result<Json<AuditRecord>, ApiError> {
    let record = state
        .engine
        .get_by_id(caller.identity(), &event_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Audit log with eventId {event_id} not found"))
        })?;
    Ok(Json(record))
}

/// GET or POST /api/audit/query
///
/// The filter is a JSON body; an empty body searches without constraints.
pub async fn query_logs(
    State(state): State<AppState>,
    caller: Caller,
    body: Bytes,
) -> Result<Json<Vec<AuditRecord>>, ApiError> {
    let filter = if body.iter().all(u8::is_ascii_whitespace) {
        SearchFilter::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::validation(format!("Invalid search filter: {e}")))?
    };

    let records = state
        .engine
        .advanced_search(caller.identity(), filter)
        .await?;
    Ok(Json(records))
}

/// DELETE /api/audit/logs/event/{eventId}
pub async fn delete_log(
    State(state): State<AppState>,
    caller: Caller,
    Path(event_id): Path<String>,
) -> Result<Response, ApiError> {
    let outcome = state
        .engine
        .delete_by_id(caller.identity(), &event_id)
        .await?;

    let response = match outcome {
        DeletionOutcome::Success { .. } => (StatusCode::OK, Json(outcome)).into_response(),
        DeletionOutcome::NotFound { message } => {
            return Err(AppError::not_found(message).into());
        }
        DeletionOutcome::Failure { reason } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiErrorResponse::new("DELETION_FAILED", reason)),
        )
            .into_response(),
    };
    Ok(response)
}

fn page_request(
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<PageRequest, AppError> {
    let Query(params) = params.map_err(|e| {
        AppError::validation(format!("Invalid pagination parameters: {}", e.body_text()))
    })?;
    params.into_page_request()
}
