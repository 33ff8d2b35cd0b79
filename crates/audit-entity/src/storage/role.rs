//! Logical storage roles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two places every audit record is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendRole {
    /// Serves lookups, searches and deletes.
    Searchable,
    /// Long-term retention copy.
    Archival,
}

impl BackendRole {
    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Searchable => "searchable",
            Self::Archival => "archival",
        }
    }
}

impl fmt::Display for BackendRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
