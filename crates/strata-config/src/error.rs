//! Configuration error types.

use std::path::PathBuf;

/// Errors that can occur when loading, saving, parsing, or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a config file from disk.
    #[error("failed to read config: {0}")]
    ReadError(#[source] std::io::Error),

    /// Failed to write a config file to disk.
    #[error("failed to write config: {0}")]
    WriteError(#[source] std::io::Error),

    /// Failed to parse RON content.
    #[error("failed to parse config: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    /// Failed to serialize config to RON.
    #[error("failed to serialize config: {0}")]
    SerializeError(#[source] ron::Error),

    /// A dimension descriptor is structurally invalid and must not be registered.
    #[error("dimension `{dimension}` is invalid: {reason}")]
    Invalid {
        /// Id of the offending dimension (may be empty if the id itself is missing).
        dimension: String,
        /// Human-readable description of the first problem found.
        reason: String,
    },

    /// A dimension file failed to load.
    #[error("{}: {source}", path.display())]
    InFile {
        /// Path of the file that failed.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    pub(crate) fn invalid(dimension: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            dimension: dimension.to_string(),
            reason: reason.into(),
        }
    }
}
