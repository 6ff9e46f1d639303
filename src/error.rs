//! Error types for veloce

use thiserror::Error;

/// Main error type for veloce operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid navigation parameters: {0}")]
    InvalidParams(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Places error: {0}")]
    Places(String),

    #[error("Geo error: {0}")]
    Geo(String),

    #[error("Location access refused: {0}")]
    PermissionDenied(String),
}

impl Error {
    /// Process exit status for the CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::PermissionDenied(_) => 2,
            _ => 1,
        }
    }
}

/// Result type alias for veloce operations
pub type Result<T> = std::result::Result<T, Error>;
