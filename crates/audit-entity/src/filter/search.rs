//! Search filter over audit records.

use audit_core::types::{PageRequest, SortDirection};
use audit_core::types::pagination::{DEFAULT_PAGE_SIZE, MAX_RESULT_WINDOW};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::record::AuditRecord;

/// Conjunctive filter over audit records.
///
/// Every `None` field imposes no constraint. Time bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_bounds"))]
pub struct SearchFilter {
    /// Exact event id.
    #[serde(default)]
    pub event_id: Option<String>,
    /// Exact emitting service.
    #[serde(default)]
    pub source_service: Option<String>,
    /// Exact event type.
    #[serde(default)]
    pub event_type: Option<String>,
    /// Exact entity type.
    #[serde(default)]
    pub entity_type: Option<String>,
    /// Exact entity id.
    #[serde(default)]
    pub entity_id: Option<String>,
    /// Exact author user id.
    #[serde(default)]
    pub changed_by_user_id: Option<String>,
    /// Lower bound on `timestamp` (inclusive).
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    /// Upper bound on `timestamp` (inclusive).
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    /// Page index (0-based).
    #[serde(default)]
    pub page: u64,
    /// Page size.
    #[serde(default = "default_size")]
    #[validate(range(min = 1, max = 1000, message = "size must be between 1 and 1000"))]
    pub size: u64,
    /// Timestamp ordering, ascending when unset.
    #[serde(default)]
    pub sort: Option<SortDirection>,
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self {
            event_id: None,
            source_service: None,
            event_type: None,
            entity_type: None,
            entity_id: None,
            changed_by_user_id: None,
            start_time: None,
            end_time: None,
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: None,
        }
    }
}

impl SearchFilter {
    /// A filter that only pages, with no other constraint.
    pub fn paged(page: PageRequest) -> Self {
        Self {
            page: page.page,
            size: page.size,
            ..Self::default()
        }
    }

    /// A paged filter restricted to records authored by `user_id`.
    pub fn for_user(user_id: impl Into<String>, page: PageRequest) -> Self {
        Self {
            changed_by_user_id: Some(user_id.into()),
            ..Self::paged(page)
        }
    }

    /// Returns a copy scoped to records authored by `user_id`.
    pub fn scoped_to(mut self, user_id: impl Into<String>) -> Self {
        self.changed_by_user_id = Some(user_id.into());
        self
    }

    /// Paging parameters of this filter.
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.size)
    }

    /// Effective sort direction.
    pub fn sort_direction(&self) -> SortDirection {
        self.sort.unwrap_or_default()
    }

    /// Returns whether `record` satisfies every set constraint.
    pub fn matches(&self, record: &AuditRecord) -> bool {
        if let Some(ref id) = self.event_id
            && record.event_id != *id
        {
            return false;
        }
        if let Some(ref service) = self.source_service
            && record.source_service != *service
        {
            return false;
        }
        if let Some(ref event_type) = self.event_type
            && record.event_type != *event_type
        {
            return false;
        }
        if let Some(ref entity_type) = self.entity_type
            && record.entity_type != *entity_type
        {
            return false;
        }
        if let Some(ref entity_id) = self.entity_id
            && record.entity_id != *entity_id
        {
            return false;
        }
        if let Some(ref user_id) = self.changed_by_user_id
            && record.changed_by.user_id != *user_id
        {
            return false;
        }
        if let Some(start) = self.start_time
            && record.timestamp < start
        {
            return false;
        }
        if let Some(end) = self.end_time
            && record.timestamp > end
        {
            return false;
        }
        true
    }
}

fn default_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

fn validate_bounds(filter: &SearchFilter) -> Result<(), ValidationError> {
    if let (Some(start), Some(end)) = (filter.start_time, filter.end_time)
        && start > end
    {
        let mut err = ValidationError::new("time_range");
        err.message = Some("startTime must not be after endTime".into());
        return Err(err);
    }
    if !filter.page_request().within_result_window() {
        let mut err = ValidationError::new("result_window");
        err.message = Some(
            format!("page * size + size must not exceed {MAX_RESULT_WINDOW}; narrow the filter")
                .into(),
        );
        return Err(err);
    }
    Ok(())
}
