//! Error types for prefsync
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Nothing here is fatal to the process. Callers either surface the error
//! (a toggle against a path that does not exist) or degrade locally
//! (a failed load becomes the default tree, a failed save leaves local
//! state as it is).

use crate::path::NodePath;
use thiserror::Error;

/// Result type alias for prefsync operations
pub type Result<T> = std::result::Result<T, Error>;

/// A toggle path does not resolve against the current tree shape
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    /// The root itself cannot be toggled
    #[error("cannot toggle the root of a preference tree")]
    EmptyPath,

    /// A segment names a key that does not exist
    #[error("no preference at '{path}'")]
    MissingKey {
        /// Path up to and including the missing key
        path: NodePath,
    },

    /// A non-final segment resolved to a leaf
    #[error("'{path}' is a leaf, cannot descend into it")]
    ThroughLeaf {
        /// Path of the leaf that was traversed
        path: NodePath,
    },
}

/// Error types for prefsync
#[derive(Debug, Error)]
pub enum Error {
    /// Toggle path did not resolve
    #[error("Structural error: {0}")]
    Structural(#[from] StructuralError),

    /// The remote record store could not be reached
    #[error("Remote unavailable: {0}")]
    RemoteUnavailable(String),

    /// The addressed record does not exist
    #[error("Record not found: {collection}/{id}")]
    RecordNotFound {
        /// Collection that was searched
        collection: String,
        /// Record identifier
        id: String,
    },

    /// Record exists but its content is not what we expect
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration could not be read or is invalid
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Operation needs a signed-in identity
    #[error("No authenticated identity")]
    Unauthenticated,
}

impl Error {
    /// Build a `RemoteUnavailable` error
    pub fn remote(msg: impl Into<String>) -> Self {
        Error::RemoteUnavailable(msg.into())
    }

    /// Build a `MalformedRecord` error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedRecord(msg.into())
    }

    /// Build an `InvalidConfig` error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }

    /// Build a `RecordNotFound` error
    pub fn record_not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Error::RecordNotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// True for failures of the transport rather than of the data
    pub fn is_remote(&self) -> bool {
        matches!(self, Error::RemoteUnavailable(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
