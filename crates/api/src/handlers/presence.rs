//! Handlers for dynamic-QR attendance.
//!
//! Bodies and queries are taken as `Result<_, Rejection>` so that even an
//! undecodable request is answered with the `{ ok: false, error }` envelope.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use presensi_core::models::{
    CheckInReceipt, CheckInRequest, GenerateTokenRequest, IssuedToken, ListQuery,
    PresenceRecord, PresenceStatusView, StatusQuery, TokenInspection, TokenStatusQuery,
};

use crate::error::AppResult;
use crate::response::Envelope;
use crate::state::AppState;

/// POST /presence/qr/generate
///
/// Mint a rotating QR token for a course session.
pub async fn generate_token(
    State(state): State<AppState>,
    payload: Result<Json<GenerateTokenRequest>, JsonRejection>,
) -> AppResult<Json<Envelope<IssuedToken>>> {
    let Json(input) = payload?;
    let issued = state.engine.generate_token(&input).await?;

    tracing::info!(
        course_id = input.course_id.as_deref().unwrap_or_default(),
        session_id = input.session_id.as_deref().unwrap_or_default(),
        expires_at = %issued.expires_at,
        "QR token generated",
    );

    Ok(Json(Envelope::ok(issued)))
}

/// GET /presence/qr/status
///
/// Token state and countdown for lecturer displays.
pub async fn token_status(
    State(state): State<AppState>,
    query: Result<Query<TokenStatusQuery>, QueryRejection>,
) -> AppResult<Json<Envelope<TokenInspection>>> {
    let Query(input) = query?;
    let inspection = state.engine.inspect_token(&input, chrono::Utc::now()).await?;

    Ok(Json(Envelope::ok(inspection)))
}

/// POST /presence/checkin
///
/// Validate a scanned token and record the student's presence.
pub async fn check_in(
    State(state): State<AppState>,
    payload: Result<Json<CheckInRequest>, JsonRejection>,
) -> AppResult<Json<Envelope<CheckInReceipt>>> {
    let Json(input) = payload?;
    let receipt = state.engine.check_in(&input).await?;

    tracing::info!(
        presence_id = %receipt.presence_id,
        user_id = input.user_id.as_deref().unwrap_or_default(),
        device_id = input.device_id.as_deref().unwrap_or_default(),
        course_id = input.course_id.as_deref().unwrap_or_default(),
        session_id = input.session_id.as_deref().unwrap_or_default(),
        "Check-in recorded",
    );

    Ok(Json(Envelope::ok(receipt)))
}

/// GET /presence/status
pub async fn check_status(
    State(state): State<AppState>,
    query: Result<Query<StatusQuery>, QueryRejection>,
) -> AppResult<Json<Envelope<PresenceStatusView>>> {
    let Query(input) = query?;
    let view = state.engine.check_status(&input).await?;

    Ok(Json(Envelope::ok(view)))
}

/// GET /presence/list
///
/// Check-ins of one session, most recent first.
pub async fn list_session(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> AppResult<Json<Envelope<Vec<PresenceRecord>>>> {
    let Query(input) = query?;
    let records = state.engine.list_session(&input).await?;

    Ok(Json(Envelope::ok(records)))
}
