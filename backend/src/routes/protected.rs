//! Endpoint reachable by any signed-in user

use crate::auth::AuthUser;
use crate::error::ApiResult;
use axum::Json;
use invite_gate_shared::{ProtectedResponse, UserView};

const PROTECTED_SECRET: &str = "This is some protected data only for logged-in users!";

/// GET /api/protected
///
/// # Authentication
/// Requires a valid session token in the Authorization header.
pub async fn protected(AuthUser(context): AuthUser) -> ApiResult<Json<ProtectedResponse>> {
    Ok(Json(ProtectedResponse {
        user: UserView::from(&context.user),
        secret: PROTECTED_SECRET.to_string(),
        timestamp: context.claims.iat,
    }))
}
