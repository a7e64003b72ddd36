//! User repository for database operations
//!
//! Functions are generic over the executor so they run equally against the
//! pool or inside a transaction.

use super::{NewUser, UserRecord};
use sqlx::PgExecutor;

/// User repository
pub struct UserRepository;

impl UserRepository {
    /// Insert a new user
    pub async fn create<'e, E>(executor: E, user: &NewUser) -> Result<UserRecord, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (email, username, password, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, username, password, role
            "#,
        )
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(executor)
        .await
    }

    /// Find user by ID
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<UserRecord>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, username, password, role
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Find user whose email or username equals `identifier`
    pub async fn find_by_login<'e, E>(
        executor: E,
        identifier: &str,
    ) -> Result<Option<UserRecord>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, username, password, role
            FROM users
            WHERE email = $1 OR username = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(identifier)
        .fetch_optional(executor)
        .await
    }

    /// Count all users
    pub async fn count<'e, E>(executor: E) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(executor)
            .await
    }
}

#[cfg(test)]
mod tests {
    // Integration tests require database - see tests/postgres_store_test.rs
    // Run with: cargo test -- --ignored
}
