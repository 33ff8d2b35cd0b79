//! # audit-engine
//!
//! Orchestrates the storage backends and the access policy. Every record is
//! written to the archival and searchable backends; reads, searches and
//! deletes go to the searchable backend only after the policy has cleared
//! (and possibly rewritten) the request.

pub mod audit;

pub use audit::{AuditEngine, BackendHealth, HealthReport};
