//! In-memory filter evaluation shared by backends without a query engine.

use std::cmp::Ordering;

use audit_core::types::SortDirection;
use audit_entity::{AuditRecord, SearchFilter};

/// Filters, orders and pages `records` according to `filter`.
///
/// Ordering is by timestamp in the requested direction, ties broken by
/// ascending event id, so consecutive pages never overlap.
pub fn evaluate(
    records: impl IntoIterator<Item = AuditRecord>,
    filter: &SearchFilter,
) -> Vec<AuditRecord> {
    let mut matched: Vec<AuditRecord> = records
        .into_iter()
        .filter(|record| filter.matches(record))
        .collect();

    let direction = filter.sort_direction();
    matched.sort_by(|a, b| compare(a, b, direction));

    let page = filter.page_request();
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);

    matched.into_iter().skip(offset).take(limit).collect()
}

/// Stable record ordering for the given direction.
pub fn compare(a: &AuditRecord, b: &AuditRecord, direction: SortDirection) -> Ordering {
    let by_time = a.timestamp.cmp(&b.timestamp);
    let by_time = match direction {
        SortDirection::Asc => by_time,
        SortDirection::Desc => by_time.reverse(),
    };
    by_time.then_with(|| a.event_id.cmp(&b.event_id))
}
