//! Error types for Klistra core operations.
//!
//! Errors are descriptive at the core level; the CLI (or any routing
//! layer) maps them to user-facing messages and status codes.

use thiserror::Error;

/// Result type alias for Klistra operations.
pub type Result<T> = std::result::Result<T, KlistraError>;

/// Core error type for Klistra operations.
#[derive(Debug, Error)]
pub enum KlistraError {
    /// Malformed or missing request fields
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Paste absent or already expired
    #[error("Not found: {0}")]
    NotFound(String),

    /// Wrong password, tampered ciphertext or rejected transport payload
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Cipher setup or randomness failure
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Conditional insert found the identifier already taken
    #[error("Identifier already in use: {0}")]
    Conflict(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Session collaborator error
    #[error("Session error: {0}")]
    Session(String),
}

impl KlistraError {
    /// Whether the error should be reported to the caller as unauthorized.
    pub fn is_authentication(&self) -> bool {
        matches!(self, KlistraError::Authentication(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, KlistraError::NotFound(_))
    }
}

impl From<rusqlite::Error> for KlistraError {
    fn from(err: rusqlite::Error) -> Self {
        KlistraError::Storage(format!("SQLite error: {}", err))
    }
}

impl From<std::io::Error> for KlistraError {
    fn from(err: std::io::Error) -> Self {
        KlistraError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for KlistraError {
    fn from(err: serde_json::Error) -> Self {
        KlistraError::InvalidInput(err.to_string())
    }
}
