use std::sync::Arc;

use presensi_core::engine::AttendanceEngine;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Attendance engine wired to the configured store.
    pub engine: Arc<AttendanceEngine>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
