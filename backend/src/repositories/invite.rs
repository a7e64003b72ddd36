//! Invite token repository for database operations

use super::InviteRecord;
use sqlx::PgExecutor;

/// Invite token repository
pub struct InviteRepository;

impl InviteRepository {
    /// Insert a new unused invite
    pub async fn create<'e, E>(
        executor: E,
        token: &str,
        created_by: i64,
    ) -> Result<InviteRecord, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, InviteRecord>(
            r#"
            INSERT INTO invite_tokens (token, created_by)
            VALUES ($1, $2)
            RETURNING id, token, used, created_at, created_by, used_by
            "#,
        )
        .bind(token)
        .bind(created_by)
        .fetch_one(executor)
        .await
    }

    /// Find invite by token
    pub async fn find_by_token<'e, E>(
        executor: E,
        token: &str,
    ) -> Result<Option<InviteRecord>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, InviteRecord>(
            r#"
            SELECT id, token, used, created_at, created_by, used_by
            FROM invite_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(executor)
        .await
    }

    /// List all invites ordered by ID
    pub async fn list<'e, E>(executor: E) -> Result<Vec<InviteRecord>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, InviteRecord>(
            r#"
            SELECT id, token, used, created_at, created_by, used_by
            FROM invite_tokens
            ORDER BY id
            "#,
        )
        .fetch_all(executor)
        .await
    }

    /// Mark an unused invite as redeemed
    ///
    /// The `used = FALSE` guard makes check-and-redeem a single statement:
    /// of two concurrent callers only one sees an affected row.
    pub async fn redeem<'e, E>(executor: E, token: &str, redeemer_id: i64) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r#"
            UPDATE invite_tokens
            SET used = TRUE, used_by = $2
            WHERE token = $1 AND used = FALSE
            "#,
        )
        .bind(token)
        .bind(redeemer_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
