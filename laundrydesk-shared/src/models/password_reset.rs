/// Password reset token storage
///
/// Reset tokens are random strings handed to the user out of band; only the
/// SHA-256 hash is persisted. A token is single-use and expires after a
/// configurable window. Creating a new token replaces any outstanding one
/// for the same user.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE password_resets (
///     user_id UUID PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
///     token_hash VARCHAR(64) NOT NULL,
///     expires_at TIMESTAMPTZ NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Stored reset-token record (hash only, never the plaintext token)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PasswordReset {
    /// User the token was issued for; one outstanding token per user
    pub user_id: Uuid,

    /// Hex-encoded SHA-256 hash of the plaintext token
    pub token_hash: String,

    /// After this instant the token is rejected
    pub expires_at: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
}

impl PasswordReset {
    /// Stores a reset token hash for a user, replacing any prior token
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        token_hash: &str,
        ttl: Duration,
    ) -> Result<Self, sqlx::Error> {
        let expires_at = Utc::now() + ttl;

        let reset = sqlx::query_as::<_, PasswordReset>(
            r#"
            INSERT INTO password_resets (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE
                SET token_hash = EXCLUDED.token_hash,
                    expires_at = EXCLUDED.expires_at,
                    created_at = NOW()
            RETURNING user_id, token_hash, expires_at, created_at
            "#,
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(pool)
        .await?;

        Ok(reset)
    }

    /// Finds an unexpired reset record by token hash
    pub async fn find_valid_by_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let reset = sqlx::query_as::<_, PasswordReset>(
            r#"
            SELECT user_id, token_hash, expires_at, created_at
            FROM password_resets
            WHERE token_hash = $1 AND expires_at > NOW()
            "#,
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await?;

        Ok(reset)
    }

    /// Deletes a reset record after use (single-use tokens)
    ///
    /// # Returns
    ///
    /// True if a record was deleted.
    pub async fn consume(pool: &PgPool, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM password_resets WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_comparison() {
        let reset = PasswordReset {
            user_id: Uuid::new_v4(),
            token_hash: "a".repeat(64),
            expires_at: Utc::now() - Duration::minutes(1),
            created_at: Utc::now() - Duration::minutes(31),
        };

        assert!(reset.expires_at < Utc::now());
    }
}
