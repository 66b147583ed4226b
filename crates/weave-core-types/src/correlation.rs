//! Correlation types for assembly tracking
//!
//! Several assemblies may be built in the same process (tests build dozens).
//! Every assembly pass carries an `AssemblyId` in its tracing span so that
//! log lines from concurrent builds can be told apart.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single assembly pass
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssemblyId(String);

impl AssemblyId {
    /// Generate a new AssemblyId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for AssemblyId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AssemblyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
