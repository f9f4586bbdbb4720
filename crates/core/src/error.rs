//! Error taxonomy of the attendance core.
//!
//! Input errors (`MissingField`, `InvalidTimestamp`) are caller mistakes.
//! Token-state errors (`TokenInvalid`, `TokenExpired`, `TokenAlreadyUsed`)
//! are routine outcomes of scanning a stale or foreign QR code. Storage
//! failures are wrapped in [`StoreError`] and left to the transport layer.

/// Failure reported by an [`AttendanceStore`](crate::store::AttendanceStore) backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Storage invariant violated: {0}")]
    Corrupt(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("missing_field: {0}")]
    MissingField(&'static str),

    #[error("invalid_ts")]
    InvalidTimestamp,

    #[error("token_invalid")]
    TokenInvalid,

    #[error("token_expired")]
    TokenExpired,

    #[error("token_already_used")]
    TokenAlreadyUsed,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CoreError {
    /// Wire error code surfaced in the `{ ok: false, error }` envelope.
    ///
    /// Store failures collapse to `internal_error`; their detail is only logged.
    pub fn code(&self) -> String {
        match self {
            Self::MissingField(field) => format!("missing_field: {field}"),
            Self::InvalidTimestamp => "invalid_ts".to_string(),
            Self::TokenInvalid => "token_invalid".to_string(),
            Self::TokenExpired => "token_expired".to_string(),
            Self::TokenAlreadyUsed => "token_already_used".to_string(),
            Self::Validation(msg) => format!("validation_error: {msg}"),
            Self::Store(_) => "internal_error".to_string(),
        }
    }

    /// Caller mistakes, recoverable by correcting the request.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::MissingField(_) | Self::InvalidTimestamp | Self::Validation(_)
        )
    }

    /// Expected outcomes of the attendance workflow (stale or foreign QR code).
    pub fn is_token_state_error(&self) -> bool {
        matches!(
            self,
            Self::TokenInvalid | Self::TokenExpired | Self::TokenAlreadyUsed
        )
    }
}
