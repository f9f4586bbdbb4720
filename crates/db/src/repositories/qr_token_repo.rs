//! Repository for the `qr_tokens` table.

use presensi_core::models::Token;
use sqlx::{PgExecutor, PgPool};

use crate::models::qr_token::QrTokenRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, token_code, course_id, session_id, issued_at, expires_at, used";

pub struct QrTokenRepo;

impl QrTokenRepo {
    /// Insert a freshly minted token, returning the created row.
    pub async fn create(pool: &PgPool, token: &Token) -> Result<QrTokenRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO qr_tokens (token_code, course_id, session_id, issued_at, expires_at, used)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QrTokenRow>(&query)
            .bind(&token.token_code)
            .bind(&token.course_id)
            .bind(&token.session_id)
            .bind(token.issued_at)
            .bind(token.expires_at)
            .bind(token.used)
            .fetch_one(pool)
            .await
    }

    /// Find a token by its code.
    pub async fn find_by_code(
        pool: &PgPool,
        token_code: &str,
    ) -> Result<Option<QrTokenRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM qr_tokens WHERE token_code = $1");
        sqlx::query_as::<_, QrTokenRow>(&query)
            .bind(token_code)
            .fetch_optional(pool)
            .await
    }

    /// Mark a token used if it is still unused.
    ///
    /// Returns `true` only for the caller whose update flipped the flag; the
    /// affected-row count is the linearization point for single use.
    pub async fn consume<'e, E: PgExecutor<'e>>(
        executor: E,
        token_code: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE qr_tokens SET used = true WHERE token_code = $1 AND used = false")
                .bind(token_code)
                .execute(executor)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
