//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! the store and the auth components.

pub mod auth;

pub use auth::{AuthContext, AuthService, SessionGrant};
