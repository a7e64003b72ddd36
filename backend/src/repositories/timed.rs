//! Deadline decorator for [`AuthStore`]

use super::{AuthStore, InviteRecord, NewUser, StoreError, StoreResult, UserRecord};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Wraps a store so that every call fails with [`StoreError::Timeout`]
/// instead of outliving `timeout`
///
/// A call cut off mid-transaction drops its transaction, which rolls back.
pub struct TimedStore {
    inner: Arc<dyn AuthStore>,
    timeout: Duration,
}

impl TimedStore {
    pub fn new(inner: Arc<dyn AuthStore>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn bounded<T>(&self, call: impl Future<Output = StoreResult<T>> + Send) -> StoreResult<T> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| StoreError::Timeout)?
    }
}

#[async_trait]
impl AuthStore for TimedStore {
    async fn ping(&self) -> StoreResult<()> {
        self.bounded(self.inner.ping()).await
    }

    async fn count_users(&self) -> StoreResult<i64> {
        self.bounded(self.inner.count_users()).await
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<UserRecord> {
        self.bounded(self.inner.insert_user(user)).await
    }

    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<UserRecord>> {
        self.bounded(self.inner.find_user_by_id(id)).await
    }

    async fn find_user_by_login(&self, identifier: &str) -> StoreResult<Option<UserRecord>> {
        self.bounded(self.inner.find_user_by_login(identifier)).await
    }

    async fn insert_invite(&self, token: &str, created_by: i64) -> StoreResult<InviteRecord> {
        self.bounded(self.inner.insert_invite(token, created_by)).await
    }

    async fn find_invite(&self, token: &str) -> StoreResult<Option<InviteRecord>> {
        self.bounded(self.inner.find_invite(token)).await
    }

    async fn list_invites(&self) -> StoreResult<Vec<InviteRecord>> {
        self.bounded(self.inner.list_invites()).await
    }

    async fn redeem_invite(&self, token: &str, redeemer_id: i64) -> StoreResult<bool> {
        self.bounded(self.inner.redeem_invite(token, redeemer_id)).await
    }

    async fn create_user_redeeming_invite(
        &self,
        user: NewUser,
        token: &str,
    ) -> StoreResult<UserRecord> {
        self.bounded(self.inner.create_user_redeeming_invite(user, token))
            .await
    }
}

#[cfg(test)]
pub(crate) mod stalled {
    use super::*;
    use crate::repositories::MemoryStore;

    /// Store whose liveness probe never answers in time
    pub(crate) struct StalledStore(pub MemoryStore);

    #[async_trait]
    impl AuthStore for StalledStore {
        async fn ping(&self) -> StoreResult<()> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        }
        async fn count_users(&self) -> StoreResult<i64> {
            self.0.count_users().await
        }
        async fn insert_user(&self, user: NewUser) -> StoreResult<UserRecord> {
            self.0.insert_user(user).await
        }
        async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<UserRecord>> {
            self.0.find_user_by_id(id).await
        }
        async fn find_user_by_login(&self, identifier: &str) -> StoreResult<Option<UserRecord>> {
            self.0.find_user_by_login(identifier).await
        }
        async fn insert_invite(&self, token: &str, created_by: i64) -> StoreResult<InviteRecord> {
            self.0.insert_invite(token, created_by).await
        }
        async fn find_invite(&self, token: &str) -> StoreResult<Option<InviteRecord>> {
            self.0.find_invite(token).await
        }
        async fn list_invites(&self) -> StoreResult<Vec<InviteRecord>> {
            self.0.list_invites().await
        }
        async fn redeem_invite(&self, token: &str, redeemer_id: i64) -> StoreResult<bool> {
            self.0.redeem_invite(token, redeemer_id).await
        }
        async fn create_user_redeeming_invite(
            &self,
            user: NewUser,
            token: &str,
        ) -> StoreResult<UserRecord> {
            self.0.create_user_redeeming_invite(user, token).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::stalled::StalledStore;
    use super::*;
    use crate::repositories::MemoryStore;

    #[tokio::test]
    async fn test_slow_call_times_out() {
        let store = TimedStore::new(
            Arc::new(StalledStore(MemoryStore::new())),
            Duration::from_millis(20),
        );
        assert!(matches!(store.ping().await, Err(StoreError::Timeout)));
        assert_eq!(store.count_users().await.unwrap(), 0);
    }
}
