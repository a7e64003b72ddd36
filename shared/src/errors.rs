//! Error types shared by the backend and API clients

use thiserror::Error;

/// Rejected user input
///
/// Carries the offending field so the HTTP layer can report it in the
/// error envelope.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
