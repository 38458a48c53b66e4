//! Error types for the matbind library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for scene and binding operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The prim handed to the resolver does not exist on its stage
    #[error("Prim \"{0}\" is not valid")]
    InvalidNode(String),

    /// Purpose token is not one of the allowed material purposes
    #[error("Purpose \"{purpose}\" is not valid. Options were: {}", .allowed.join(", "))]
    InvalidPurpose { purpose: String, allowed: Vec<String> },

    /// Malformed scene path or prim name
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Authoring targeted a prim that has not been defined
    #[error("Prim not found: {0}")]
    PrimNotFound(String),

    /// Collection includes refer back to themselves
    #[error("Collection include cycle at {0}")]
    CollectionCycle(String),

    /// Scene description is structurally wrong
    #[error("Invalid scene description: {0}")]
    InvalidScene(String),

    /// File does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create an invalid path error.
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }

    /// Create an invalid scene error.
    pub fn invalid_scene(msg: impl Into<String>) -> Self {
        Self::InvalidScene(msg.into())
    }
}

/// Result type alias for matbind operations.
pub type Result<T> = std::result::Result<T, Error>;
