//! Storage backend identities and roles.

pub mod kind;
pub mod role;

pub use kind::BackendKind;
pub use role::BackendRole;
