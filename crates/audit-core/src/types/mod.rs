//! Core type definitions used across the audit workspace.

pub mod pagination;
pub mod sorting;

pub use pagination::PageRequest;
pub use sorting::SortDirection;
