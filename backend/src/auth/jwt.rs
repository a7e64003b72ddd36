//! Session token issuance and verification
//!
//! Session tokens are HS256 JWTs (`header.payload.signature`, base64url)
//! carrying the user id plus issued-at and expiry. Verification is stateless:
//! authenticity comes from the signature alone.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user_id: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Session token verification failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Undecodable token or signature mismatch
    #[error("Invalid token")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,
}

/// Pre-computed JWT keys for efficient token operations
/// These are expensive to create, so we cache them in AppState
#[derive(Clone)]
struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

/// Issues and verifies signed, time-bounded session tokens
///
/// Keys are derived once from the configured secret and shared behind an Arc.
#[derive(Clone)]
pub struct SessionTokenCodec {
    keys: JwtKeys,
    validation: Validation,
    ttl: Duration,
}

impl SessionTokenCodec {
    /// Create a codec from the configured secret
    ///
    /// Fails on an empty secret; there is no fallback signing key.
    pub fn new(secret: &str, ttl_secs: i64) -> Result<Self> {
        if secret.trim().is_empty() {
            anyhow::bail!("Session signing secret is empty");
        }
        if ttl_secs <= 0 {
            anyhow::bail!("Session lifetime must be positive, got {}s", ttl_secs);
        }

        // Expiry is checked by hand against the caller's clock, with no leeway.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            keys: JwtKeys::new(secret),
            validation,
            ttl: Duration::seconds(ttl_secs),
        })
    }

    /// Issue a token for `user_id` valid from now
    #[inline]
    pub fn issue(&self, user_id: i64) -> Result<String> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(&self, user_id: i64, now: DateTime<Utc>) -> Result<String> {
        let claims = SessionClaims {
            user_id,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to sign session token: {}", e))
    }

    /// Verify signature and expiry against the current time
    #[inline]
    pub fn verify(&self, token: &str) -> Result<SessionClaims, SessionError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify signature, then require `exp > now`
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, SessionError> {
        let claims = decode::<SessionClaims>(token, &self.keys.decoding, &self.validation)
            .map_err(|_| SessionError::InvalidSignature)?
            .claims;

        if claims.exp <= now.timestamp() {
            return Err(SessionError::Expired);
        }

        Ok(claims)
    }

    /// Session lifetime in seconds
    #[inline]
    pub fn ttl_secs(&self) -> i64 {
        self.ttl.num_seconds()
    }
}
