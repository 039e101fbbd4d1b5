//! Common error types for the org chart core

use thiserror::Error;

use crate::store::BackendError;

/// Common result type for org chart operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the core and the web service
#[derive(Error, Debug)]
pub enum Error {
    /// Person or manager lookup failed
    #[error("Not found: {0}")]
    NotFound(String),

    /// Required field missing or malformed input, raised before any mutation
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Record store call failed
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(#[from] BackendError),

    /// Navigation points at a person that no longer resolves
    #[error("Ambiguous navigation state: {0}")]
    AmbiguousState(String),

    /// Delete refused while the person still has subordinates
    #[error("{name} still has {} subordinate(s); reassign them first", subordinates.len())]
    ReassignmentRequired {
        name: String,
        subordinates: Vec<String>,
    },

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding error (local roster files)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for a validation error on a missing form field
    pub fn missing_field(field: &str) -> Self {
        Error::ValidationFailed(format!("{} is required", field))
    }
}
