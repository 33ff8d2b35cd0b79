//! Storage backend implementations.

#[cfg(feature = "elasticsearch")]
pub mod elasticsearch;
pub mod memory;
#[cfg(feature = "s3")]
pub mod s3;

#[cfg(feature = "elasticsearch")]
pub use elasticsearch::ElasticsearchBackend;
pub use memory::MemoryBackend;
#[cfg(feature = "s3")]
pub use s3::S3Backend;
