//! Storage backend kind enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of backend implementations the service can construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Elasticsearch document index.
    Elasticsearch,
    /// S3-compatible object storage.
    S3,
    /// Process-local map.
    Memory,
}

impl BackendKind {
    /// Every known kind.
    pub const ALL: [Self; 3] = [Self::Elasticsearch, Self::S3, Self::Memory];

    /// Return the backend kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Elasticsearch => "elasticsearch",
            Self::S3 => "s3",
            Self::Memory => "memory",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = audit_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "elasticsearch" | "elastic" => Ok(Self::Elasticsearch),
            "s3" | "aws-s3" => Ok(Self::S3),
            "memory" => Ok(Self::Memory),
            _ => Err(audit_core::AppError::configuration(format!(
                "Unknown storage backend: '{s}'. Expected one of: elasticsearch, s3, memory"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audit_core::ErrorKind;

    #[test]
    fn parses_known_names() {
        assert_eq!("elasticsearch".parse::<BackendKind>().unwrap(), BackendKind::Elasticsearch);
        assert_eq!("S3".parse::<BackendKind>().unwrap(), BackendKind::S3);
        assert_eq!(" memory ".parse::<BackendKind>().unwrap(), BackendKind::Memory);
    }

    #[test]
    fn unknown_name_is_configuration_error() {
        let err = "mongodb".parse::<BackendKind>().unwrap_err();
        assert!(err.is(ErrorKind::Configuration));
        assert!(err.message.contains("mongodb"));
    }

    #[test]
    fn display_round_trips() {
        for kind in BackendKind::ALL {
            assert_eq!(kind.to_string().parse::<BackendKind>().unwrap(), kind);
        }
    }
}
