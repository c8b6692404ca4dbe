//! Error types for spookytslib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while discovering and compiling source folders
#[derive(Error, Debug)]
pub enum SpookyError {
    /// No destinations were given to the orchestrator
    #[error("No destinations provided. Please specify at least one directory to convert ts folders into js folders.")]
    NoDestinations,

    /// A requested location does not exist
    #[error("Location '{0}' does not exist")]
    LocationNotFound(String),

    /// A location exists but its directory entries cannot be listed
    #[error("Location '{path}' cannot be read: {source}")]
    UnreadableRoot {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A filesystem operation on a specific path failed
    #[error("IO error on '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The external transformation engine could not be started
    #[error("failed to launch '{program}': {source}")]
    EngineLaunch {
        program: String,
        source: std::io::Error,
    },

    /// A directory exclusion is not a valid glob over directory names
    #[error("invalid directory exclusion '{pattern}': {message}")]
    InvalidExclusion { pattern: String, message: String },
}

impl SpookyError {
    /// Wrap an IO error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SpookyError::Io {
            path: path.into(),
            source,
        }
    }
}
