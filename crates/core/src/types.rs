use chrono::{DateTime, SecondsFormat, Utc};

/// All timestamps are UTC.
pub type Timestamp = DateTime<Utc>;

/// Parse an ISO-8601 / RFC 3339 timestamp into UTC.
///
/// Offsets other than `Z` are accepted and converted. Returns `None` for
/// anything that does not parse; callers decide which error that maps to.
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Format a timestamp as RFC 3339 with a `Z` suffix.
///
/// Whole seconds render without a fractional part
/// (`2024-01-01T10:02:00Z`); sub-second precision is kept when present.
pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Serde helpers so every wire timestamp goes through [`format_timestamp`].
pub mod rfc3339 {
    use serde::Serializer;

    use super::{format_timestamp, Timestamp};

    pub fn serialize<S: Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(ts))
    }

    pub mod option {
        use serde::Serializer;

        use crate::types::{format_timestamp, Timestamp};

        pub fn serialize<S: Serializer>(
            ts: &Option<Timestamp>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match ts {
                Some(ts) => serializer.serialize_str(&format_timestamp(ts)),
                None => serializer.serialize_none(),
            }
        }
    }
}
