//! Authenticated caller identity.

pub mod identity;

pub use identity::CallerIdentity;
