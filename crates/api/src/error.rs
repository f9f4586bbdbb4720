use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use presensi_core::error::CoreError;

use crate::response::Envelope;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds transport-specific
/// variants. Implements [`IntoResponse`] to produce the failure envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `presensi_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A request that could not be decoded (malformed JSON, bad query).
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Core(core) if core.is_input_error() => {
                tracing::debug!(code = %core.code(), "Rejected invalid request");
                (StatusCode::BAD_REQUEST, core.code())
            }
            AppError::Core(core) if core.is_token_state_error() => {
                tracing::info!(code = %core.code(), "Token rejected");
                (StatusCode::CONFLICT, core.code())
            }
            AppError::Core(core) => {
                tracing::error!(error = %core, "Internal core error");
                (StatusCode::INTERNAL_SERVER_ERROR, core.code())
            }
            AppError::BadRequest(msg) => {
                tracing::debug!(error = %msg, "Undecodable request");
                (StatusCode::BAD_REQUEST, format!("bad_request: {msg}"))
            }
        };

        (status, axum::Json(Envelope::<()>::error(code))).into_response()
    }
}
