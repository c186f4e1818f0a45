//! Error types for spots-core

use thiserror::Error;

/// Result type alias using spots-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in spots-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Location access was refused
    #[error("Location permission denied")]
    PermissionDenied,

    /// A position fix could not be obtained
    #[error("Position unavailable: {0}")]
    PositionUnavailable(String),

    /// The persistence layer could not be read or written
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A stored payload could not be parsed
    #[error("Corrupt stored value under '{key}': {source}")]
    CorruptState {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Neither the requested map app nor the web fallback could be opened
    #[error("Could not open map: {0}")]
    MapLaunchFailed(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Reverse geocoding failed
    #[error("Geocoding error: {0}")]
    Geocoding(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<libsql::Error> for Error {
    fn from(error: libsql::Error) -> Self {
        Self::StorageUnavailable(error.to_string())
    }
}

impl Error {
    /// Build a `CorruptState` error for the given storage key.
    pub fn corrupt(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::CorruptState {
            key: key.into(),
            source,
        }
    }

    /// Whether this error came from the persistence layer itself.
    pub const fn is_storage_failure(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_) | Self::CorruptState { .. })
    }
}
