use presensi_core::models::Token;
use presensi_core::types::Timestamp;
use sqlx::FromRow;

/// A row from the `qr_tokens` table.
#[derive(Debug, Clone, FromRow)]
pub struct QrTokenRow {
    pub id: i64,
    pub token_code: String,
    pub course_id: String,
    pub session_id: String,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
    pub used: bool,
}

impl From<QrTokenRow> for Token {
    fn from(row: QrTokenRow) -> Self {
        Token {
            token_code: row.token_code,
            course_id: row.course_id,
            session_id: row.session_id,
            issued_at: row.issued_at,
            expires_at: row.expires_at,
            used: row.used,
        }
    }
}
