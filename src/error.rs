//! Error handling for busmix
//!
//! All errors here are configuration/programmer errors: they are raised
//! during setup (graph construction, config load) or explicit snapshot and
//! transition requests, never during steady-state per-tick advance. Hot-path
//! calls (`set_float`, `get_float`) signal unknown names through their return
//! value instead.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for busmix operations
pub type Result<T> = std::result::Result<T, MixerError>;

/// Main error type for busmix operations
#[derive(Error, Debug)]
pub enum MixerError {
    // Structural Errors (graph / table / store construction)
    #[error("Duplicate name: '{name}' already exists as a {kind}")]
    DuplicateName { name: String, kind: &'static str },

    #[error("Unknown parent bus: '{parent}' (while creating bus '{name}')")]
    UnknownParent { name: String, parent: String },

    #[error("Unknown bus: '{name}'")]
    UnknownBus { name: String },

    #[error("Unknown parameter: '{name}'")]
    UnknownParameter { name: String },

    #[error("Config has no buses; a root bus is required")]
    NoRootBus,

    // Transition Errors
    #[error("Unknown snapshot: '{name}'")]
    UnknownSnapshot { name: String },

    #[error("Invalid transition weights: {reason}")]
    InvalidWeight { reason: String },

    // Configuration I/O Errors
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MixerError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            MixerError::DuplicateName { .. } => "DUPLICATE_NAME",
            MixerError::UnknownParent { .. } => "UNKNOWN_PARENT",
            MixerError::UnknownBus { .. } => "UNKNOWN_BUS",
            MixerError::UnknownParameter { .. } => "UNKNOWN_PARAMETER",
            MixerError::NoRootBus => "NO_ROOT_BUS",
            MixerError::UnknownSnapshot { .. } => "UNKNOWN_SNAPSHOT",
            MixerError::InvalidWeight { .. } => "INVALID_WEIGHT",
            MixerError::FileRead { .. } => "FILE_READ",
            MixerError::FileWrite { .. } => "FILE_WRITE",
            MixerError::Io(_) => "IO_ERROR",
            MixerError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Whether the condition can resolve itself if the caller retries.
    ///
    /// Always false for the structural taxonomy: a missing or duplicate name
    /// cannot self-resolve, so there is no automatic retry anywhere.
    pub fn is_retryable(&self) -> bool {
        matches!(self, MixerError::Io(_))
    }
}
