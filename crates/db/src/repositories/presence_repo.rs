//! Repository for the `presence_records` table.

use presensi_core::types::Timestamp;
use sqlx::{PgExecutor, PgPool};

use crate::models::presence::PresenceRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, course_id, session_id, device_id, status, last_ts";

pub struct PresenceRepo;

impl PresenceRepo {
    /// Insert or refresh the record for `(user_id, course_id, session_id)`.
    ///
    /// An existing row keeps its `id` and only has `device_id`, `status` and
    /// `last_ts` replaced.
    pub async fn upsert_checked_in<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: &str,
        course_id: &str,
        session_id: &str,
        device_id: &str,
        last_ts: Timestamp,
    ) -> Result<PresenceRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO presence_records (user_id, course_id, session_id, device_id, status, last_ts)
             VALUES ($1, $2, $3, $4, 'checked_in', $5)
             ON CONFLICT (user_id, course_id, session_id) DO UPDATE
             SET device_id = EXCLUDED.device_id,
                 status = 'checked_in',
                 last_ts = EXCLUDED.last_ts,
                 updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PresenceRow>(&query)
            .bind(user_id)
            .bind(course_id)
            .bind(session_id)
            .bind(device_id)
            .bind(last_ts)
            .fetch_one(executor)
            .await
    }

    /// Find the record for a key.
    pub async fn find_by_key(
        pool: &PgPool,
        user_id: &str,
        course_id: &str,
        session_id: &str,
    ) -> Result<Option<PresenceRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM presence_records
             WHERE user_id = $1 AND course_id = $2 AND session_id = $3"
        );
        sqlx::query_as::<_, PresenceRow>(&query)
            .bind(user_id)
            .bind(course_id)
            .bind(session_id)
            .fetch_optional(pool)
            .await
    }

    /// List the records of one session, most recent check-in first.
    pub async fn list_by_session(
        pool: &PgPool,
        course_id: &str,
        session_id: &str,
        limit: i64,
    ) -> Result<Vec<PresenceRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM presence_records
             WHERE course_id = $1 AND session_id = $2
             ORDER BY last_ts DESC, id ASC
             LIMIT $3"
        );
        sqlx::query_as::<_, PresenceRow>(&query)
            .bind(course_id)
            .bind(session_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
