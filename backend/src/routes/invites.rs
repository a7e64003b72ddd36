//! Admin-only invite routes

use crate::auth::AdminUser;
use crate::error::ApiResult;
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use invite_gate_shared::{InviteCreatedResponse, InviteView};

/// Create invite routes
pub fn invite_routes() -> Router<AppState> {
    Router::new()
        .route("/invite", post(create_invite))
        .route("/invites", get(list_invites))
}

/// POST /api/invite - Create a single-use invite token
async fn create_invite(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> ApiResult<Json<InviteCreatedResponse>> {
    let token = state.auth().invites().create(admin.user_id()).await?;
    Ok(Json(InviteCreatedResponse { token }))
}

/// GET /api/invites - List all invites, oldest first
async fn list_invites(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> ApiResult<Json<Vec<InviteView>>> {
    let invites = state.auth().invites().list().await?;
    Ok(Json(invites.into_iter().map(InviteView::from).collect()))
}
