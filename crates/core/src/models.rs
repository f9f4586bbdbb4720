//! Attendance entities and the request/response DTOs of the engine.
//!
//! Request DTOs keep every field optional so that an absent field is
//! reported as `missing_field: <name>` by validation instead of failing
//! deserialization. JSON body fields also accept non-string scalars (a
//! frontend sending `"course_id": 101`); these are coerced to text and
//! then validated like any other value.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::types::{rfc3339, Timestamp};

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A single rotating QR credential for one class session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub token_code: String,
    pub course_id: String,
    pub session_id: String,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
    pub used: bool,
}

impl Token {
    /// Whether the token was minted for this exact course and session.
    pub fn is_bound_to(&self, course_id: &str, session_id: &str) -> bool {
        self.course_id == course_id && self.session_id == session_id
    }

    /// A check-in at exactly `expires_at` is still on time.
    pub fn is_expired_at(&self, ts: Timestamp) -> bool {
        ts > self.expires_at
    }
}

/// Presence outcome of a student for a (user, course, session) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceStatus {
    CheckedIn,
    NotCheckedIn,
}

/// Identity of a presence record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PresenceKey {
    pub user_id: String,
    pub course_id: String,
    pub session_id: String,
}

/// A stored presence record. One per [`PresenceKey`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresenceRecord {
    pub presence_id: String,
    pub user_id: String,
    pub course_id: String,
    pub session_id: String,
    /// Device that performed the most recent successful check-in (audit only).
    pub device_id: String,
    pub status: PresenceStatus,
    #[serde(with = "rfc3339")]
    pub last_ts: Timestamp,
}

/// A validated check-in ready to be committed by the store.
#[derive(Debug, Clone)]
pub struct CheckIn {
    pub key: PresenceKey,
    pub device_id: String,
    pub ts: Timestamp,
}

/// Render a presence sequence number as a stable presence id (`PR-0001`).
pub fn format_presence_id(seq: i64) -> String {
    format!("PR-{seq:04}")
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Read a JSON body field as text whatever its JSON type.
///
/// `null` is absent, strings pass through, and numbers, booleans, arrays
/// and objects become their JSON rendering. A numeric `ts` therefore
/// reaches timestamp parsing and fails there as `invalid_ts`.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Body of `POST /presence/qr/generate`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateTokenRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    pub course_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub session_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub ts: Option<String>,
}

/// Body of `POST /presence/checkin`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckInRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub device_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub course_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub session_id: Option<String>,
    /// Bare token code or the raw payload a QR scanner produced.
    #[serde(default, deserialize_with = "lenient_text")]
    pub qr_token: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub ts: Option<String>,
}

/// Query of `GET /presence/status`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusQuery {
    pub user_id: Option<String>,
    pub course_id: Option<String>,
    pub session_id: Option<String>,
}

/// Query of `GET /presence/list`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub course_id: Option<String>,
    pub session_id: Option<String>,
    /// Kept as text so a blank `limit=` falls back to the default.
    pub limit: Option<String>,
}

/// Query of `GET /presence/qr/status`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenStatusQuery {
    pub qr_token: Option<String>,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Result of token generation.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    #[serde(rename = "qr_token")]
    pub token_code: String,
    #[serde(with = "rfc3339")]
    pub expires_at: Timestamp,
}

/// Result of a successful check-in.
#[derive(Debug, Clone, Serialize)]
pub struct CheckInReceipt {
    pub presence_id: String,
    pub status: PresenceStatus,
}

/// Result of a status query; synthesized when no record exists.
#[derive(Debug, Clone, Serialize)]
pub struct PresenceStatusView {
    pub user_id: String,
    pub course_id: String,
    pub session_id: String,
    pub status: PresenceStatus,
    #[serde(with = "rfc3339::option")]
    pub last_ts: Option<Timestamp>,
}

impl PresenceStatusView {
    pub fn not_checked_in(key: PresenceKey) -> Self {
        Self {
            user_id: key.user_id,
            course_id: key.course_id,
            session_id: key.session_id,
            status: PresenceStatus::NotCheckedIn,
            last_ts: None,
        }
    }
}

impl From<PresenceRecord> for PresenceStatusView {
    fn from(record: PresenceRecord) -> Self {
        Self {
            user_id: record.user_id,
            course_id: record.course_id,
            session_id: record.session_id,
            status: record.status,
            last_ts: Some(record.last_ts),
        }
    }
}

/// Lecturer-facing view of a token and its countdown.
#[derive(Debug, Clone, Serialize)]
pub struct TokenInspection {
    #[serde(rename = "qr_token")]
    pub token_code: String,
    pub course_id: String,
    pub session_id: String,
    #[serde(with = "rfc3339")]
    pub expires_at: Timestamp,
    pub used: bool,
    pub remaining_secs: i64,
    pub band: crate::countdown::CountdownBand,
}
