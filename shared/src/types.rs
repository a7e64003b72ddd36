//! API request and response types
//!
//! Every endpoint answers with one of these fixed records.

use crate::models::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub invite_token: String,
}

/// Login request
///
/// `email_or_username` is matched against both columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email_or_username: String,
    pub password: String,
}

/// Public view of an account (never includes the password hash)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserView {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub role: Role,
}

/// Session token plus the account it was issued for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserView,
}

/// Payload of the protected endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectedResponse {
    pub user: UserView,
    pub secret: String,
    /// Issued-at of the presented session (Unix seconds)
    pub timestamp: i64,
}

/// Newly created invite token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteCreatedResponse {
    pub token: String,
}

/// Invite record as listed to admins
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InviteView {
    pub id: i64,
    pub token: String,
    pub used: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: i64,
    pub used_by: Option<i64>,
}

/// Links advertised by the public endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicLinks {
    pub register: String,
    pub login: String,
}

/// Static informational payload of the public endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicInfoResponse {
    pub message: String,
    pub info: String,
    pub links: PublicLinks,
}
