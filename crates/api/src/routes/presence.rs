//! Route definitions for QR attendance, mounted at `/presence`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::presence;
use crate::state::AppState;

/// ```text
/// POST   /qr/generate      -> generate_token
/// GET    /qr/status        -> token_status
/// POST   /checkin          -> check_in
/// GET    /status           -> check_status
/// GET    /list             -> list_session
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/qr/generate", post(presence::generate_token))
        .route("/qr/status", get(presence::token_status))
        .route("/checkin", post(presence::check_in))
        .route("/status", get(presence::check_status))
        .route("/list", get(presence::list_session))
}
