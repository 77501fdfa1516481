//! Error types for Workly.

use thiserror::Error;

/// Errors that can occur in Workly operations.
#[derive(Error, Debug)]
pub enum WorklyError {
    #[error("{0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl WorklyError {
    pub(crate) fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        WorklyError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

impl From<serde_json::Error> for WorklyError {
    fn from(e: serde_json::Error) -> Self {
        WorklyError::Serialization(e.to_string())
    }
}

/// Result type alias for Workly operations.
pub type WorklyResult<T> = Result<T, WorklyError>;
