//! Error types for the backup manager
//!
//! Configuration problems are fatal and stop the run before any storage
//! command is issued. Store failures are scoped to a single volume and are
//! reported without aborting the remaining volumes.

use thiserror::Error;

use crate::constants::exit_codes;

/// Main error type for the backup manager
#[derive(Debug, Error)]
pub enum ManagerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The zfs binary could not be resolved on PATH
    #[error("zfs command cannot be found")]
    ZfsNotFound,
}

impl ManagerError {
    /// Process exit code used by the binary for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            ManagerError::Config(ConfigError::InvalidValue { .. })
            | ManagerError::Config(ConfigError::MissingRequired { .. }) => {
                exit_codes::INVALID_DATASET_CONFIG
            }
            ManagerError::Config(_) => exit_codes::CONFIG_LOAD_FAILED,
            ManagerError::ZfsNotFound => exit_codes::ZFS_NOT_FOUND,
        }
    }
}

/// Configuration error variants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Failed to load configuration file
    #[error("Failed to load config from '{path}': {reason}")]
    LoadFailed { path: String, reason: String },

    /// Invalid configuration value
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// Missing required configuration
    #[error("Missing required field: {field}")]
    MissingRequired { field: String },

    /// Configuration parsing error
    #[error("Failed to parse config: {reason}")]
    ParseError { reason: String },

    /// Logging level not in DEBUG, INFO, WARNING, ERROR, CRITICAL
    #[error("log level must be one of: DEBUG, INFO, WARNING, ERROR, CRITICAL (got '{value}')")]
    UnknownLogLevel { value: String },
}

/// Failures reported by a [`SnapshotStore`](crate::zfs::SnapshotStore)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Command ran and exited unsuccessfully
    #[error("Command '{command}' failed (exit code {status}): {stderr}")]
    CommandFailed {
        command: String,
        status: i32,
        stderr: String,
    },

    /// Command could not be started
    #[error("Failed to spawn '{command}': {reason}")]
    SpawnFailed { command: String, reason: String },

    /// Some snapshots of a destroy set were left in place
    #[error("Failed to destroy {} snapshot(s) of '{volume}': {reason}", .failed.len())]
    DestroyIncomplete {
        volume: String,
        failed: Vec<String>,
        reason: String,
    },
}

impl StoreError {
    /// Which of `requested` a failed destroy call left in place.
    ///
    /// Only [`StoreError::DestroyIncomplete`] narrows this down; any other
    /// error means nothing is known to be gone.
    pub fn undestroyed<'a>(&'a self, requested: &'a [String]) -> &'a [String] {
        match self {
            StoreError::DestroyIncomplete { failed, .. } => failed,
            _ => requested,
        }
    }
}
