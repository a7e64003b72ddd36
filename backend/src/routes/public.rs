//! Unauthenticated informational endpoint

use axum::Json;
use invite_gate_shared::{PublicInfoResponse, PublicLinks};

/// ANY /api/public
pub async fn public() -> Json<PublicInfoResponse> {
    Json(PublicInfoResponse {
        message: "Welcome to Invite Gate!".to_string(),
        info: "This is a public endpoint. Register with an invite token or login to access more features."
            .to_string(),
        links: PublicLinks {
            register: "/api/register".to_string(),
            login: "/api/login".to_string(),
        },
    })
}
