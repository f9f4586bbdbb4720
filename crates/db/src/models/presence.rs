use presensi_core::error::StoreError;
use presensi_core::models::{format_presence_id, PresenceRecord, PresenceStatus};
use presensi_core::types::Timestamp;
use sqlx::FromRow;

/// A row from the `presence_records` table.
#[derive(Debug, Clone, FromRow)]
pub struct PresenceRow {
    pub id: i64,
    pub user_id: String,
    pub course_id: String,
    pub session_id: String,
    pub device_id: String,
    pub status: String,
    pub last_ts: Timestamp,
}

impl TryFrom<PresenceRow> for PresenceRecord {
    type Error = StoreError;

    fn try_from(row: PresenceRow) -> Result<Self, Self::Error> {
        let status = match row.status.as_str() {
            "checked_in" => PresenceStatus::CheckedIn,
            "not_checked_in" => PresenceStatus::NotCheckedIn,
            other => {
                return Err(StoreError::Corrupt(format!(
                    "presence record {} has unknown status '{other}'",
                    row.id
                )))
            }
        };

        Ok(PresenceRecord {
            presence_id: format_presence_id(row.id),
            user_id: row.user_id,
            course_id: row.course_id,
            session_id: row.session_id,
            device_id: row.device_id,
            status,
            last_ts: row.last_ts,
        })
    }
}
