//! The `{ ok, data }` / `{ ok, error }` response envelope.
//!
//! Every presence endpoint answers with this shape; several independent
//! frontends parse it, so the field names are fixed.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Success or failure envelope.
///
/// Serializes as `{ "ok": true, "data": T }` or
/// `{ "ok": false, "error": "<code>" }`.
#[derive(Debug)]
pub enum Envelope<T> {
    Ok(T),
    Err(String),
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self::Ok(data)
    }

    pub fn error(code: impl Into<String>) -> Self {
        Self::Err(code.into())
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Envelope", 2)?;
        match self {
            Self::Ok(data) => {
                state.serialize_field("ok", &true)?;
                state.serialize_field("data", data)?;
            }
            Self::Err(error) => {
                state.serialize_field("ok", &false)?;
                state.serialize_field("error", error)?;
            }
        }
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn success_shape() {
        let value = serde_json::to_value(Envelope::ok(json!({ "presence_id": "PR-0001" }))).unwrap();
        assert_eq!(value, json!({ "ok": true, "data": { "presence_id": "PR-0001" } }));
    }

    #[test]
    fn failure_shape() {
        let value = serde_json::to_value(Envelope::<()>::error("token_expired")).unwrap();
        assert_eq!(value, json!({ "ok": false, "error": "token_expired" }));
    }
}
