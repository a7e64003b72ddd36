//! Authentication extractors
//!
//! [`AuthUser`] runs Authorize on the `Authorization` header; [`AdminUser`]
//! additionally requires the admin role. Handlers take them as arguments.

use crate::error::ApiError;
use crate::services::AuthContext;
use crate::state::AppState;
use axum::{
    extract::FromRef,
    http::{header::AUTHORIZATION, request::Parts},
};

/// Raw `Authorization` header value; empty when absent or not valid UTF-8
fn authorization_header(parts: &Parts) -> &str {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

/// Authenticated user extracted from the session token
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthContext);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let context = app_state.auth().authorize(authorization_header(parts)).await?;
        Ok(AuthUser(context))
    }
}

/// Authenticated user holding the admin role
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthContext);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let context = app_state
            .auth()
            .require_admin(authorization_header(parts))
            .await?;
        Ok(AdminUser(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Request};

    fn parts_with(header: Option<HeaderValue>) -> Parts {
        let mut builder = Request::builder().uri("/api/protected");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_missing_header_reads_as_empty() {
        assert_eq!(authorization_header(&parts_with(None)), "");
    }

    #[test]
    fn test_header_value_passed_through() {
        let parts = parts_with(Some(HeaderValue::from_static("Bearer abc")));
        assert_eq!(authorization_header(&parts), "Bearer abc");
    }

    #[test]
    fn test_non_utf8_header_reads_as_empty() {
        let parts = parts_with(Some(HeaderValue::from_bytes(&[0xff, 0xfe]).unwrap()));
        assert_eq!(authorization_header(&parts), "");
    }
}
