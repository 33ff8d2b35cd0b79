//! Static user directory and HTTP Basic credentials.

pub mod basic;
pub mod users;

pub use basic::BasicCredentials;
pub use users::UserDirectory;
