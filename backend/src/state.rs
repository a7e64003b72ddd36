//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.

use crate::auth::SessionTokenCodec;
use crate::config::AppConfig;
use crate::repositories::AuthStore;
use crate::services::AuthService;
use anyhow::Result;
use std::sync::Arc;

/// Shared application state
///
/// All fields are Arc'd or Arc-backed, so cloning per request is O(1).
#[derive(Clone)]
pub struct AppState {
    /// Injected persistent store, wrapped in the store timeout
    pub store: Arc<dyn AuthStore>,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Auth flows over the store, with pre-computed session keys
    pub auth: AuthService,
}

impl AppState {
    /// Create a new application state
    ///
    /// Fails when the configured signing secret is unusable.
    pub fn new(store: Arc<dyn AuthStore>, config: AppConfig) -> Result<Self> {
        let sessions = SessionTokenCodec::new(&config.jwt.secret, config.jwt.session_ttl_secs)?;
        let auth = AuthService::new(store.clone(), sessions, config.auth.store_timeout());

        Ok(Self {
            store: auth.store().clone(),
            config: Arc::new(config),
            auth,
        })
    }

    /// Get a reference to the store
    #[inline]
    pub fn store(&self) -> &Arc<dyn AuthStore> {
        &self.store
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the auth service
    #[inline]
    pub fn auth(&self) -> &AuthService {
        &self.auth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStore;

    fn config_with_secret(secret: &str) -> AppConfig {
        let mut config = AppConfig::default();
        config.jwt.secret = secret.to_string();
        config
    }

    #[test]
    fn test_state_refuses_missing_secret() {
        let result = AppState::new(Arc::new(MemoryStore::new()), AppConfig::default());
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_state_clone_shares_store() {
        let state = AppState::new(Arc::new(MemoryStore::new()), config_with_secret("s")).unwrap();
        let cloned = state.clone();

        state.auth().seed_default_users().await.unwrap();
        assert_eq!(cloned.store().count_users().await.unwrap(), 2);
    }

    #[test]
    fn test_session_codec_is_precomputed() {
        let state = AppState::new(Arc::new(MemoryStore::new()), config_with_secret("s")).unwrap();
        let token = state.auth().sessions().issue(1).unwrap();
        assert!(!token.is_empty());
        assert_eq!(state.auth().sessions().ttl_secs(), 86400);
    }
}
