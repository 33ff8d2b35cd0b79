//! Advanced search filter.

pub mod search;

pub use search::SearchFilter;
