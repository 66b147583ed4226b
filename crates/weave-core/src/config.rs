//! Assembly options
//!
//! Options are plain data with defaults for every field, loadable from a
//! TOML string or file. Unknown keys are rejected so typos surface early.
//!
//! ```toml
//! contention = "warn"
//! trace_actions = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, WeaveError};

/// What to do when two interrupts declare overlapping resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentionSeverity {
    /// Fail the build with `ResourceContention`
    #[default]
    Deny,
    /// Log a warning and record a diagnostic on the nexus
    Warn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssemblyOptions {
    pub contention: ContentionSeverity,
    /// Emit a trace event before every action body runs
    pub trace_actions: bool,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            contention: ContentionSeverity::Deny,
            trace_actions: true,
        }
    }
}

impl AssemblyOptions {
    /// Parse options from TOML text
    ///
    /// # Errors
    /// * `InvalidConfig` - malformed TOML, unknown keys or bad values
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| WeaveError::InvalidConfig {
            reason: e.to_string(),
        })
    }

    /// Read and parse an options file
    ///
    /// # Errors
    /// * `Io` - the file cannot be read
    /// * `InvalidConfig` - the content does not parse
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| WeaveError::Io {
            message: format!("{}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&text)
    }
}
