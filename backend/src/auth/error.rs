//! Failure taxonomy of the authentication and invitation flows

use super::jwt::SessionError;
use crate::repositories::StoreError;
use invite_gate_shared::ValidationError;
use thiserror::Error;

/// Errors returned by [`crate::services::AuthService`] and its components
#[derive(Error, Debug)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Unknown or already redeemed invite token presented at registration
    #[error("Invalid invite token")]
    InvalidInvite,

    #[error("Email or username already taken")]
    DuplicateUser,

    /// Same error for unknown account and wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, forged or expired session token
    #[error("{0}")]
    Unauthenticated(String),

    #[error("Admin role required")]
    Forbidden,

    /// Valid session for an account that no longer exists
    #[error("User not found")]
    UserNotFound,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<SessionError> for AuthError {
    fn from(err: SessionError) -> Self {
        AuthError::Unauthenticated(err.to_string())
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
