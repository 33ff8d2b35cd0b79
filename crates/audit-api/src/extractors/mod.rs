//! Custom Axum extractors.

pub mod caller;
pub mod pagination;

pub use caller::Caller;
pub use pagination::PaginationParams;
