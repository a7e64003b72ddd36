//! Invite token generation and single-use redemption

use super::error::{AuthError, AuthResult};
use crate::repositories::{AuthStore, InviteRecord, NewUser, StoreError, UserRecord};
use argon2::password_hash::rand_core::{OsRng, RngCore};
use std::sync::Arc;
use tracing::{info, warn};

/// Random bytes per invite token (128 bits)
pub const INVITE_TOKEN_BYTES: usize = 16;

/// Length of the hex-encoded token
pub const INVITE_TOKEN_LEN: usize = INVITE_TOKEN_BYTES * 2;

/// Generates unguessable invite codes and enforces one-time redemption
#[derive(Clone)]
pub struct InviteTokenStore {
    store: Arc<dyn AuthStore>,
}

impl InviteTokenStore {
    pub fn new(store: Arc<dyn AuthStore>) -> Self {
        Self { store }
    }

    /// Fresh random token, lowercase hex
    ///
    /// Uniqueness is left to the table constraint; a collision fails `create`.
    pub fn generate() -> String {
        let mut bytes = [0u8; INVITE_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Generate and persist an unused invite created by `creator_id`
    pub async fn create(&self, creator_id: i64) -> AuthResult<String> {
        let token = Self::generate();
        self.store.insert_invite(&token, creator_id).await?;

        info!(
            created_by = creator_id,
            invite = %token_prefix(&token),
            "Invite token created"
        );

        Ok(token)
    }

    /// Whether `token` exists and has not been used
    ///
    /// Unknown tokens are [`AuthError::NotFound`], not `false`.
    pub async fn is_redeemable(&self, token: &str) -> AuthResult<bool> {
        let invite = self
            .store
            .find_invite(token)
            .await?
            .ok_or_else(|| AuthError::NotFound("Invite token".to_string()))?;

        Ok(invite.is_redeemable())
    }

    /// Mark `token` as used by an existing account `redeemer_id`
    ///
    /// A single conditional update: fails with [`AuthError::InvalidInvite`]
    /// when the token is unknown or was already used. Registration goes
    /// through [`InviteTokenStore::redeem_for_new_user`] instead, which also
    /// creates the account.
    pub async fn redeem(&self, token: &str, redeemer_id: i64) -> AuthResult<()> {
        if !self.store.redeem_invite(token, redeemer_id).await? {
            return Err(AuthError::InvalidInvite);
        }

        info!(
            used_by = redeemer_id,
            invite = %token_prefix(token),
            "Invite token redeemed"
        );

        Ok(())
    }

    /// Insert `user` and redeem `token` for it in one unit of work
    ///
    /// Either both writes commit or neither does. A token that is unknown or
    /// already used is [`AuthError::InvalidInvite`]; a taken email or
    /// username is [`AuthError::DuplicateUser`].
    pub async fn redeem_for_new_user(&self, user: NewUser, token: &str) -> AuthResult<UserRecord> {
        let created = self
            .store
            .create_user_redeeming_invite(user, token)
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => AuthError::DuplicateUser,
                StoreError::InviteUnavailable => {
                    warn!(invite = %token_prefix(token), "Invite consumed by a concurrent registration");
                    AuthError::InvalidInvite
                }
                other => AuthError::Store(other),
            })?;

        info!(
            used_by = created.id,
            invite = %token_prefix(token),
            "Invite token redeemed"
        );

        Ok(created)
    }

    /// All invites ordered by id
    pub async fn list(&self) -> AuthResult<Vec<InviteRecord>> {
        Ok(self.store.list_invites().await?)
    }
}

/// Leading characters of a token, safe to log
pub(crate) fn token_prefix(token: &str) -> &str {
    let end = token
        .char_indices()
        .nth(8)
        .map(|(idx, _)| idx)
        .unwrap_or(token.len());
    &token[..end]
}
