//! Operation outcome types.

pub mod deletion;

pub use deletion::DeletionOutcome;
