//! Request field validation shared by every engine operation.

use crate::error::CoreError;
use crate::types::{parse_timestamp, Timestamp};

/// Default page size for session listings.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Upper bound for session listings.
pub const MAX_LIST_LIMIT: i64 = 500;

/// Require a non-blank string field, returning it trimmed.
///
/// `None`, the empty string and whitespace-only values all count as missing.
pub fn require<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, CoreError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(CoreError::MissingField(field)),
    }
}

/// Parse an already-present timestamp field.
pub fn parse_ts(raw: &str) -> Result<Timestamp, CoreError> {
    parse_timestamp(raw).ok_or(CoreError::InvalidTimestamp)
}

/// Parse an optional listing limit. Absent or blank means "use the default".
pub fn parse_limit(raw: Option<&str>) -> Result<Option<i64>, CoreError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| CoreError::Validation(format!("limit must be an integer, got '{v}'"))),
    }
}

/// Clamp a caller-supplied listing limit into `1..=MAX_LIST_LIMIT`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT)
}
