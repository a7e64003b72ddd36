//! Registration, login and authorization flows
//!
//! # Performance Optimizations
//!
//! - Password hashing/verification runs on the blocking thread pool
//! - The session codec holds pre-computed keys
//! - Every store call is bounded by the configured store timeout

use crate::auth::{
    token_prefix, AuthError, AuthResult, InviteTokenStore, PasswordService, SessionClaims,
    SessionTokenCodec,
};
use crate::repositories::{AuthStore, NewUser, StoreError, TimedStore, UserRecord};
use invite_gate_shared::validation::{validate_login_request, validate_register_request};
use invite_gate_shared::{LoginRequest, RegisterRequest, Role};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Accounts created on first start when the users table is empty
const DEFAULT_USERS: [(&str, &str, &str, Role); 2] = [
    ("admin@admin.com", "admin", "admin", Role::Admin),
    ("user@user.com", "user", "user", Role::User),
];

/// Session token together with the account it was issued for
#[derive(Debug, Clone)]
pub struct SessionGrant {
    pub token: String,
    pub user: UserRecord,
}

/// Outcome of a successful Authorize
///
/// `user` is re-read from the store, so `role` is the current one rather
/// than whatever held when the token was issued.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: UserRecord,
    pub claims: SessionClaims,
}

impl AuthContext {
    #[inline]
    pub fn user_id(&self) -> i64 {
        self.user.id
    }

    #[inline]
    pub fn role(&self) -> Role {
        self.user.role
    }
}

/// Composes password hashing, invite redemption and session issuance
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn AuthStore>,
    invites: InviteTokenStore,
    sessions: SessionTokenCodec,
}

impl AuthService {
    /// Build the service over `store`; each store call is bounded by `store_timeout`
    pub fn new(
        store: Arc<dyn AuthStore>,
        sessions: SessionTokenCodec,
        store_timeout: Duration,
    ) -> Self {
        let store: Arc<dyn AuthStore> = Arc::new(TimedStore::new(store, store_timeout));
        Self {
            invites: InviteTokenStore::new(store.clone()),
            store,
            sessions,
        }
    }

    /// The store as seen by the service, every call deadline-bounded
    #[inline]
    pub fn store(&self) -> &Arc<dyn AuthStore> {
        &self.store
    }

    #[inline]
    pub fn invites(&self) -> &InviteTokenStore {
        &self.invites
    }

    #[inline]
    pub fn sessions(&self) -> &SessionTokenCodec {
        &self.sessions
    }

    /// Create an account by redeeming an invite
    ///
    /// User insertion and invite redemption commit together; when two
    /// registrations race on one invite exactly one of them succeeds.
    pub async fn register(&self, req: &RegisterRequest) -> AuthResult<SessionGrant> {
        validate_register_request(req)?;

        match self.invites.is_redeemable(&req.invite_token).await {
            Ok(true) => {}
            Ok(false) | Err(AuthError::NotFound(_)) => {
                warn!(invite = %token_prefix(&req.invite_token), "Registration with unusable invite");
                return Err(AuthError::InvalidInvite);
            }
            Err(e) => return Err(e),
        }

        let password_hash = PasswordService::hash_async(req.password.clone()).await?;

        let new_user = NewUser {
            email: req.email.clone(),
            username: req.username.clone(),
            password_hash,
            role: Role::User,
        };

        let user = self
            .invites
            .redeem_for_new_user(new_user, &req.invite_token)
            .await?;

        let token = self.sessions.issue(user.id)?;

        info!(
            user_id = user.id,
            username = %user.username,
            invite = %token_prefix(&req.invite_token),
            "User registered"
        );

        Ok(SessionGrant { token, user })
    }

    /// Authenticate by email or username and password
    ///
    /// Unknown account and wrong password yield the same
    /// [`AuthError::InvalidCredentials`].
    pub async fn login(&self, req: &LoginRequest) -> AuthResult<SessionGrant> {
        validate_login_request(req)?;

        let user = match self.store.find_user_by_login(&req.email_or_username).await? {
            Some(user) => user,
            None => {
                warn!("Login attempt for unknown account");
                PasswordService::verify_dummy_async(req.password.clone()).await?;
                return Err(AuthError::InvalidCredentials);
            }
        };

        let valid = PasswordService::verify_async(req.password.clone(), user.password_hash.clone())
            .await
            .unwrap_or_else(|e| {
                warn!(user_id = user.id, error = %e, "Stored password hash is unreadable");
                false
            });

        if !valid {
            warn!(user_id = user.id, "Login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.sessions.issue(user.id)?;

        info!(user_id = user.id, role = %user.role, "User logged in");

        Ok(SessionGrant { token, user })
    }

    /// Verify a bearer token and load the account's current role
    ///
    /// The `Bearer ` prefix is optional.
    pub async fn authorize(&self, bearer: &str) -> AuthResult<AuthContext> {
        let token = strip_bearer(bearer);
        if token.is_empty() {
            return Err(AuthError::Unauthenticated("No token provided".to_string()));
        }

        let claims = self.sessions.verify(token)?;

        let user = self
            .store
            .find_user_by_id(claims.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(AuthContext { user, claims })
    }

    /// Authorize, then require the admin role
    pub async fn require_admin(&self, bearer: &str) -> AuthResult<AuthContext> {
        let context = self.authorize(bearer).await?;
        if !context.role().is_admin() {
            warn!(user_id = context.user_id(), "Admin-only operation refused");
            return Err(AuthError::Forbidden);
        }
        Ok(context)
    }

    /// Create the default admin and user accounts if no account exists yet
    ///
    /// Returns whether seeding happened.
    pub async fn seed_default_users(&self) -> AuthResult<bool> {
        if self.store.count_users().await? > 0 {
            return Ok(false);
        }

        for (email, username, password, role) in DEFAULT_USERS {
            let password_hash = PasswordService::hash_async(password.to_string()).await?;
            let seeded = self
                .store
                .insert_user(NewUser {
                    email: email.to_string(),
                    username: username.to_string(),
                    password_hash,
                    role,
                })
                .await;

            match seeded {
                Ok(user) => info!(user_id = user.id, username, role = %role, "Seeded default user"),
                // Another instance seeded concurrently
                Err(StoreError::Duplicate(_)) => warn!(username, "Default user already present"),
                Err(e) => return Err(e.into()),
            }
        }

        Ok(true)
    }
}

/// Drop an optional `Bearer ` scheme prefix
fn strip_bearer(header: &str) -> &str {
    let header = header.trim();
    match header.strip_prefix("Bearer") {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim(),
        _ => header,
    }
}
