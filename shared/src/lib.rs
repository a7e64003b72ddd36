//! Invite Gate Shared Library
//!
//! Wire types, account models and input validation shared between the
//! backend and any client of the HTTP API.

pub mod errors;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::{Role, RoleParseError};
pub use types::*;
