//! Authentication module
//!
//! Session tokens (HS256 JWT), argon2 password hashing and single-use
//! invite tokens, plus the axum extractors that gate protected routes.

mod error;
mod invite;
mod jwt;
mod middleware;
mod password;

pub use error::{AuthError, AuthResult};
pub use invite::{InviteTokenStore, INVITE_TOKEN_BYTES, INVITE_TOKEN_LEN};
pub(crate) use invite::token_prefix;
pub use jwt::{SessionClaims, SessionError, SessionTokenCodec};
pub use middleware::{AdminUser, AuthUser};
pub use password::PasswordService;
