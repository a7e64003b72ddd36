//! Authentication routes
//!
//! Registration (invite required) and login. Both answer with a session
//! token and the account view.

use crate::error::{ApiJson, ApiResult};
use crate::services::SessionGrant;
use crate::state::AppState;
use axum::{extract::State, routing::post, Json, Router};
use invite_gate_shared::{AuthResponse, LoginRequest, RegisterRequest, UserView};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

impl From<SessionGrant> for AuthResponse {
    fn from(grant: SessionGrant) -> Self {
        AuthResponse {
            user: UserView::from(&grant.user),
            token: grant.token,
        }
    }
}

/// Register a new user with an invite token
///
/// POST /api/register
async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let grant = state.auth().register(&req).await?;
    Ok(Json(grant.into()))
}

/// Login with email or username and password
///
/// POST /api/login
async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let grant = state.auth().login(&req).await?;
    Ok(Json(grant.into()))
}
