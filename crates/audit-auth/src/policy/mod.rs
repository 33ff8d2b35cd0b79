//! Access rules for audit records.

pub mod access;
pub mod decision;

pub use access::AccessPolicy;
pub use decision::{Decision, DenyReason};
