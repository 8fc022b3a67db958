//! Custom error types for collection-lint.
//!
//! Provides structured error handling with clear error categories.

use crate::capability::Capability;
use crate::rules::RuleId;
use std::path::PathBuf;
use thiserror::Error;

/// A type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during collection-lint operation.
///
/// Resolution failures inside the matcher are never represented here; they
/// degrade to "no match" at the call site.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to parse a semantic snapshot file.
    #[error("Failed to parse {path}: {message}")]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Failed to read or access a file.
    #[error("IO error for {path}: {source}")]
    Io {
        /// Path to the file that caused the error.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to load or parse configuration.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// Two rules were registered under the same id.
    #[error("Rule id {id} is already registered (by '{existing}', rejected '{rejected}')")]
    DuplicateRuleId {
        id: RuleId,
        existing: &'static str,
        rejected: &'static str,
    },

    /// Two capabilities resolve to the same defining interface.
    #[error("Capabilities {first} and {second} are both defined by interface '{interface}'")]
    DuplicateCapability {
        first: Capability,
        second: Capability,
        interface: String,
    },

    /// The host cancelled the analysis mid-traversal.
    #[error("Analysis cancelled")]
    Cancelled,

    /// A rule id does not fit the four-digit `COLnnnn` form.
    #[error("Rule '{rule}' has id {number}, above the largest rule id {max}")]
    RuleIdOutOfRange {
        number: u16,
        max: u16,
        rule: &'static str,
    },
}

impl Error {
    /// Create a parse error for a specific file.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an IO error for a specific file.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
