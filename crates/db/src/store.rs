//! [`AttendanceStore`] backed by PostgreSQL.

use async_trait::async_trait;
use presensi_core::error::StoreError;
use presensi_core::models::{CheckIn, PresenceKey, PresenceRecord, Token};
use presensi_core::store::AttendanceStore;

use crate::repositories::{PresenceRepo, QrTokenRepo};
use crate::DbPool;

/// Database-backed store for production deployments.
#[derive(Clone)]
pub struct PgAttendanceStore {
    pool: DbPool,
}

impl PgAttendanceStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map a sqlx failure into the core's opaque store error.
fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

#[async_trait]
impl AttendanceStore for PgAttendanceStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn insert_token(&self, token: &Token) -> Result<(), StoreError> {
        QrTokenRepo::create(&self.pool, token).await.map_err(backend)?;
        Ok(())
    }

    async fn find_token(&self, token_code: &str) -> Result<Option<Token>, StoreError> {
        let row = QrTokenRepo::find_by_code(&self.pool, token_code)
            .await
            .map_err(backend)?;
        Ok(row.map(Token::from))
    }

    async fn commit_check_in(
        &self,
        token_code: &str,
        check_in: &CheckIn,
    ) -> Result<Option<PresenceRecord>, StoreError> {
        let mut tx = self.pool.begin().await.map_err(backend)?;

        if !QrTokenRepo::consume(&mut *tx, token_code)
            .await
            .map_err(backend)?
        {
            tx.rollback().await.map_err(backend)?;
            tracing::debug!(
                course_id = %check_in.key.course_id,
                session_id = %check_in.key.session_id,
                "Token already consumed by a concurrent check-in"
            );
            return Ok(None);
        }

        let row = PresenceRepo::upsert_checked_in(
            &mut *tx,
            &check_in.key.user_id,
            &check_in.key.course_id,
            &check_in.key.session_id,
            &check_in.device_id,
            check_in.ts,
        )
        .await
        .map_err(backend)?;

        tx.commit().await.map_err(backend)?;
        PresenceRecord::try_from(row).map(Some)
    }

    async fn find_presence(
        &self,
        key: &PresenceKey,
    ) -> Result<Option<PresenceRecord>, StoreError> {
        PresenceRepo::find_by_key(&self.pool, &key.user_id, &key.course_id, &key.session_id)
            .await
            .map_err(backend)?
            .map(PresenceRecord::try_from)
            .transpose()
    }

    async fn list_presence(
        &self,
        course_id: &str,
        session_id: &str,
        limit: i64,
    ) -> Result<Vec<PresenceRecord>, StoreError> {
        PresenceRepo::list_by_session(&self.pool, course_id, session_id, limit)
            .await
            .map_err(backend)?
            .into_iter()
            .map(PresenceRecord::try_from)
            .collect()
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await.map_err(backend)
    }
}
