//! Data access layer
//!
//! [`AuthStore`] is the persistence seam injected into the auth services.
//! [`PgStore`] backs it with PostgreSQL; [`MemoryStore`] is an in-process
//! implementation with the same guarantees, used by tests and local runs.

pub mod invite;
pub mod memory;
pub mod postgres;
pub mod timed;
pub mod user;

pub use invite::InviteRepository;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use timed::TimedStore;
pub use user::UserRepository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use invite_gate_shared::{InviteView, Role, UserView};
use thiserror::Error;

/// Account row
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub username: String,
    #[sqlx(rename = "password")]
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
}

impl From<&UserRecord> for UserView {
    fn from(user: &UserRecord) -> Self {
        UserView {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            role: user.role,
        }
    }
}

/// Account to be inserted
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// Invite token row
///
/// `used` is true exactly when `used_by` is set; neither ever reverts.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct InviteRecord {
    pub id: i64,
    pub token: String,
    pub used: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: i64,
    pub used_by: Option<i64>,
}

impl InviteRecord {
    pub fn is_redeemable(&self) -> bool {
        !self.used
    }
}

impl From<InviteRecord> for InviteView {
    fn from(invite: InviteRecord) -> Self {
        InviteView {
            id: invite.id,
            token: invite.token,
            used: invite.used,
            created_at: invite.created_at,
            created_by: invite.created_by,
            used_by: invite.used_by,
        }
    }
}

/// Store failures
#[derive(Error, Debug)]
pub enum StoreError {
    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {0}")]
    Duplicate(String),

    /// Conditional redemption matched no unused invite
    #[error("Invite token is not redeemable")]
    InviteUnavailable,

    #[error("Store call timed out")]
    Timeout,

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::Duplicate(db_err.constraint().unwrap_or("unique").to_string())
            }
            _ => StoreError::Database(err),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistent store for accounts and invite tokens
#[async_trait]
pub trait AuthStore: Send + Sync {
    /// Cheap liveness probe
    async fn ping(&self) -> StoreResult<()>;

    async fn count_users(&self) -> StoreResult<i64>;

    /// Fails with [`StoreError::Duplicate`] when email or username is taken
    async fn insert_user(&self, user: NewUser) -> StoreResult<UserRecord>;

    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<UserRecord>>;

    /// Match `identifier` against email or username
    async fn find_user_by_login(&self, identifier: &str) -> StoreResult<Option<UserRecord>>;

    /// Persist a fresh, unused invite
    async fn insert_invite(&self, token: &str, created_by: i64) -> StoreResult<InviteRecord>;

    async fn find_invite(&self, token: &str) -> StoreResult<Option<InviteRecord>>;

    /// All invites, oldest first
    async fn list_invites(&self) -> StoreResult<Vec<InviteRecord>>;

    /// Atomically mark an unused invite as used by `redeemer_id`
    ///
    /// Returns `false` when the token is unknown or already used. Registration
    /// uses [`AuthStore::create_user_redeeming_invite`], which performs the same
    /// conditional update inside the user-insert transaction.
    async fn redeem_invite(&self, token: &str, redeemer_id: i64) -> StoreResult<bool>;

    /// Insert `user` and redeem `token` for it as one unit of work
    ///
    /// Either both writes land or neither does. Fails with
    /// [`StoreError::InviteUnavailable`] when the invite was already consumed.
    async fn create_user_redeeming_invite(
        &self,
        user: NewUser,
        token: &str,
    ) -> StoreResult<UserRecord>;
}
