//! Password hashing using argon2
//!
//! New hashes are Argon2id PHC strings with a random per-hash salt. Digests
//! written by the previous system (unsalted SHA-256, base64) still verify so
//! existing rows keep working, but every such verification logs a warning:
//! identical passwords share a digest under that scheme.
//!
//! # Performance Considerations
//!
//! Argon2 is intentionally CPU-intensive. Async callers use the `*_async`
//! variants, which run on the blocking thread pool.

use anyhow::Result;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use once_cell::sync::OnceCell;
use sha2::{Digest, Sha256};
use tracing::warn;

/// PHC strings start with `$<algorithm>$`
const PHC_PREFIX: char = '$';

/// Argon2 hash checked against when no account matched, hashed on first use
static DUMMY_HASH: OnceCell<String> = OnceCell::new();

/// Password hashing service
///
/// Uses Argon2id which is the recommended variant for password hashing.
/// It provides resistance against both side-channel and GPU-based attacks.
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using argon2 (blocking operation)
    pub fn hash(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
        Ok(hash.to_string())
    }

    /// Hash a password asynchronously (non-blocking)
    pub async fn hash_async(password: String) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::hash(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a password against a stored hash (blocking operation)
    ///
    /// Accepts Argon2 PHC strings and legacy SHA-256 digests.
    pub fn verify(password: &str, hash: &str) -> Result<bool> {
        if !hash.starts_with(PHC_PREFIX) {
            warn!("Verifying against an unsalted legacy SHA-256 password digest; rehash recommended");
            return Ok(legacy_digest(password) == hash);
        }

        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid hash format: {}", e))?;
        if parsed_hash.salt.is_none() || parsed_hash.hash.is_none() {
            anyhow::bail!("Invalid hash format: missing salt or digest");
        }
        let argon2 = Argon2::default();
        Ok(argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Verify a password asynchronously (non-blocking)
    pub async fn verify_async(password: String, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Run a full Argon2 verification against a fixed hash and discard the result
    ///
    /// Called when no account matched a login, so that an unknown account
    /// costs the same as a wrong password.
    pub fn verify_dummy(password: &str) -> Result<()> {
        let hash = DUMMY_HASH.get_or_try_init(|| Self::hash("invite-gate-dummy-password"))?;
        Self::verify(password, hash)?;
        Ok(())
    }

    /// Async variant of [`PasswordService::verify_dummy`]
    pub async fn verify_dummy_async(password: String) -> Result<()> {
        tokio::task::spawn_blocking(move || Self::verify_dummy(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }
}

/// Digest format of the previous system: base64(SHA-256(password))
fn legacy_digest(password: &str) -> String {
    STANDARD.encode(Sha256::digest(password.as_bytes()))
}
