//! Input validation functions
//!
//! Applied to registration and login bodies before anything touches the
//! store. Uses the `validator` crate for the email grammar.

use crate::errors::ValidationError;
use crate::types::{LoginRequest, RegisterRequest};
use validator::ValidateEmail;

pub const MAX_EMAIL_LEN: usize = 255;
pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 64;
pub const MAX_PASSWORD_LEN: usize = 128;

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::new("email", "Email cannot be empty"));
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(ValidationError::new("email", "Email too long"));
    }
    if !email.validate_email() {
        return Err(ValidationError::new("email", "Invalid email format"));
    }
    Ok(())
}

/// Validate username: ASCII letters, digits, `_`, `.` and `-`
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.chars().count();
    if len < MIN_USERNAME_LEN || len > MAX_USERNAME_LEN {
        return Err(ValidationError::new(
            "username",
            format!(
                "Username must be between {} and {} characters",
                MIN_USERNAME_LEN, MAX_USERNAME_LEN
            ),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err(ValidationError::new(
            "username",
            "Username may only contain letters, digits, '_', '.' and '-'",
        ));
    }
    Ok(())
}

/// Validate password
///
/// Only presence and an upper bound are enforced; there is no strength policy.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::new("password", "Password cannot be empty"));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(ValidationError::new("password", "Password too long"));
    }
    Ok(())
}

/// Validate a full registration body
pub fn validate_register_request(req: &RegisterRequest) -> Result<(), ValidationError> {
    validate_email(&req.email)?;
    validate_username(&req.username)?;
    validate_password(&req.password)?;
    if req.invite_token.trim().is_empty() {
        return Err(ValidationError::new("invite_token", "Invite token is required"));
    }
    Ok(())
}

/// Validate a login body
pub fn validate_login_request(req: &LoginRequest) -> Result<(), ValidationError> {
    if req.email_or_username.trim().is_empty() {
        return Err(ValidationError::new(
            "email_or_username",
            "Email or username is required",
        ));
    }
    if req.password.is_empty() {
        return Err(ValidationError::new("password", "Password cannot be empty"));
    }
    Ok(())
}
