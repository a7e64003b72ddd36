//! PostgreSQL-backed [`AuthStore`]

use super::{
    AuthStore, InviteRecord, InviteRepository, NewUser, StoreError, StoreResult, UserRecord,
    UserRepository,
};
use crate::db;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

/// Store over a pooled PostgreSQL connection
///
/// Each call acquires a connection for its own unit of work and releases it
/// on return.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[inline]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl AuthStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        db::health_check(&self.pool).await?;
        Ok(())
    }

    async fn count_users(&self) -> StoreResult<i64> {
        Ok(UserRepository::count(&self.pool).await?)
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<UserRecord> {
        Ok(UserRepository::create(&self.pool, &user).await?)
    }

    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<UserRecord>> {
        Ok(UserRepository::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_login(&self, identifier: &str) -> StoreResult<Option<UserRecord>> {
        Ok(UserRepository::find_by_login(&self.pool, identifier).await?)
    }

    async fn insert_invite(&self, token: &str, created_by: i64) -> StoreResult<InviteRecord> {
        Ok(InviteRepository::create(&self.pool, token, created_by).await?)
    }

    async fn find_invite(&self, token: &str) -> StoreResult<Option<InviteRecord>> {
        Ok(InviteRepository::find_by_token(&self.pool, token).await?)
    }

    async fn list_invites(&self) -> StoreResult<Vec<InviteRecord>> {
        Ok(InviteRepository::list(&self.pool).await?)
    }

    async fn redeem_invite(&self, token: &str, redeemer_id: i64) -> StoreResult<bool> {
        Ok(InviteRepository::redeem(&self.pool, token, redeemer_id).await?)
    }

    async fn create_user_redeeming_invite(
        &self,
        user: NewUser,
        token: &str,
    ) -> StoreResult<UserRecord> {
        let mut tx = self.pool.begin().await?;

        let created = UserRepository::create(&mut *tx, &user).await?;

        if !InviteRepository::redeem(&mut *tx, token, created.id).await? {
            debug!(user_id = created.id, "Invite already consumed, rolling back user insert");
            tx.rollback().await?;
            return Err(StoreError::InviteUnavailable);
        }

        tx.commit().await?;

        Ok(created)
    }
}
