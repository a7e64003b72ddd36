//! In-process [`AuthStore`]
//!
//! Holds all rows behind one mutex, so every call is its own serializable
//! unit of work. Enforces the same unique constraints as the SQL schema.

use super::{AuthStore, InviteRecord, NewUser, StoreError, StoreResult, UserRecord};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Tables {
    users: Vec<UserRecord>,
    invites: Vec<InviteRecord>,
    next_user_id: i64,
    next_invite_id: i64,
}

impl Tables {
    fn check_unique_user(&self, user: &NewUser) -> StoreResult<()> {
        if self.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate("users_email_key".to_string()));
        }
        if self.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::Duplicate("users_username_key".to_string()));
        }
        Ok(())
    }

    fn push_user(&mut self, user: NewUser) -> StoreResult<UserRecord> {
        self.check_unique_user(&user)?;
        self.next_user_id += 1;
        let record = UserRecord {
            id: self.next_user_id,
            email: user.email,
            username: user.username,
            password_hash: user.password_hash,
            role: user.role,
        };
        self.users.push(record.clone());
        Ok(record)
    }

    fn redeem(&mut self, token: &str, redeemer_id: i64) -> bool {
        match self
            .invites
            .iter_mut()
            .find(|invite| invite.token == token && !invite.used)
        {
            Some(invite) => {
                invite.used = true;
                invite.used_by = Some(redeemer_id);
                true
            }
            None => false,
        }
    }
}

/// Memory-backed store
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_after_user_insert: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `create_user_redeeming_invite` fail between its two writes
    ///
    /// Simulates a crash mid-registration; the staged user insert is rolled back.
    pub fn fail_after_user_insert(&self, fail: bool) {
        self.fail_after_user_insert.store(fail, Ordering::SeqCst);
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl AuthStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn count_users(&self) -> StoreResult<i64> {
        Ok(self.tables().users.len() as i64)
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<UserRecord> {
        self.tables().push_user(user)
    }

    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<UserRecord>> {
        Ok(self.tables().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_login(&self, identifier: &str) -> StoreResult<Option<UserRecord>> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|u| u.email == identifier || u.username == identifier)
            .cloned())
    }

    async fn insert_invite(&self, token: &str, created_by: i64) -> StoreResult<InviteRecord> {
        let mut tables = self.tables();
        if tables.invites.iter().any(|invite| invite.token == token) {
            return Err(StoreError::Duplicate("invite_tokens_token_key".to_string()));
        }
        if !tables.users.iter().any(|u| u.id == created_by) {
            return Err(StoreError::Unavailable(format!(
                "foreign key violation: no user {}",
                created_by
            )));
        }
        tables.next_invite_id += 1;
        let record = InviteRecord {
            id: tables.next_invite_id,
            token: token.to_string(),
            used: false,
            created_at: Utc::now(),
            created_by,
            used_by: None,
        };
        tables.invites.push(record.clone());
        Ok(record)
    }

    async fn find_invite(&self, token: &str) -> StoreResult<Option<InviteRecord>> {
        Ok(self
            .tables()
            .invites
            .iter()
            .find(|invite| invite.token == token)
            .cloned())
    }

    async fn list_invites(&self) -> StoreResult<Vec<InviteRecord>> {
        // Inserted with increasing ids, so already ordered.
        Ok(self.tables().invites.clone())
    }

    async fn redeem_invite(&self, token: &str, redeemer_id: i64) -> StoreResult<bool> {
        Ok(self.tables().redeem(token, redeemer_id))
    }

    async fn create_user_redeeming_invite(
        &self,
        user: NewUser,
        token: &str,
    ) -> StoreResult<UserRecord> {
        let mut tables = self.tables();
        let rollback_len = tables.users.len();
        let rollback_next_id = tables.next_user_id;

        let created = tables.push_user(user)?;

        if self.fail_after_user_insert.load(Ordering::SeqCst) {
            tables.users.truncate(rollback_len);
            tables.next_user_id = rollback_next_id;
            return Err(StoreError::Unavailable(
                "injected failure after user insert".to_string(),
            ));
        }

        if !tables.redeem(token, created.id) {
            tables.users.truncate(rollback_len);
            tables.next_user_id = rollback_next_id;
            return Err(StoreError::InviteUnavailable);
        }

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invite_gate_shared::Role;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            email: format!("{}@example.com", name),
            username: name.to_string(),
            password_hash: "hash".to_string(),
            role: Role::User,
        }
    }

    async fn store_with_invite(token: &str) -> MemoryStore {
        let store = MemoryStore::new();
        let admin = store.insert_user(new_user("admin")).await.unwrap();
        store.insert_invite(token, admin.id).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_duplicate_email_and_username_rejected() {
        let store = MemoryStore::new();
        store.insert_user(new_user("alice")).await.unwrap();

        let mut same_email = new_user("alice2");
        same_email.email = "alice@example.com".to_string();
        assert!(matches!(
            store.insert_user(same_email).await,
            Err(StoreError::Duplicate(_))
        ));
        assert!(matches!(
            store.insert_user(new_user("alice")).await,
            Err(StoreError::Duplicate(_))
        ));
        assert_eq!(store.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_login_lookup_matches_email_or_username() {
        let store = MemoryStore::new();
        let bob = store.insert_user(new_user("bob")).await.unwrap();

        let by_name = store.find_user_by_login("bob").await.unwrap().unwrap();
        let by_email = store.find_user_by_login("bob@example.com").await.unwrap().unwrap();
        assert_eq!(by_name.id, bob.id);
        assert_eq!(by_email.id, bob.id);
        assert!(store.find_user_by_login("carol").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_redeem_only_once() {
        let store = store_with_invite("tok").await;

        assert!(store.redeem_invite("tok", 1).await.unwrap());
        assert!(!store.redeem_invite("tok", 1).await.unwrap());
        assert!(!store.redeem_invite("missing", 1).await.unwrap());

        let invite = store.find_invite("tok").await.unwrap().unwrap();
        assert!(invite.used);
        assert_eq!(invite.used_by, Some(1));
    }

    #[tokio::test]
    async fn test_register_rolls_back_user_when_invite_consumed() {
        let store = store_with_invite("tok").await;
        store.redeem_invite("tok", 1).await.unwrap();

        let result = store.create_user_redeeming_invite(new_user("late"), "tok").await;
        assert!(matches!(result, Err(StoreError::InviteUnavailable)));
        assert_eq!(store.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_injected_failure_leaves_no_partial_state() {
        let store = store_with_invite("tok").await;
        store.fail_after_user_insert(true);

        let result = store.create_user_redeeming_invite(new_user("eve"), "tok").await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert_eq!(store.count_users().await.unwrap(), 1);
        assert!(store.find_invite("tok").await.unwrap().unwrap().is_redeemable());

        // Recovers once the fault clears, reusing the rolled-back id
        store.fail_after_user_insert(false);
        let eve = store
            .create_user_redeeming_invite(new_user("eve"), "tok")
            .await
            .unwrap();
        assert_eq!(eve.id, 2);
        assert_eq!(store.find_invite("tok").await.unwrap().unwrap().used_by, Some(2));
    }

    #[tokio::test]
    async fn test_invites_listed_in_creation_order() {
        let store = store_with_invite("first").await;
        store.insert_invite("second", 1).await.unwrap();

        let tokens: Vec<String> = store
            .list_invites()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.token)
            .collect();
        assert_eq!(tokens, vec!["first", "second"]);
        assert!(matches!(
            store.insert_invite("first", 1).await,
            Err(StoreError::Duplicate(_))
        ));
    }
}
