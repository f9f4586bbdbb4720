#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use presensi_core::engine::AttendanceEngine;
use presensi_core::store::MemoryAttendanceStore;
use presensi_core::token::TokenPolicy;
use serde_json::Value;
use tower::ServiceExt;

use presensi_api::config::ServerConfig;
use presensi_api::router::build_app_router;
use presensi_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults and no database.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        token_policy: TokenPolicy::default(),
        low_time_secs: 30,
        database_url: None,
    }
}

/// Build the full application router over a fresh in-memory store.
///
/// Uses the same `build_app_router` as `main.rs`, so the middleware stack
/// (CORS, request ID, timeout, tracing, panic recovery) is exercised too.
pub fn build_test_app() -> Router {
    let config = test_config();
    let engine = AttendanceEngine::new(Arc::new(MemoryAttendanceStore::new()), config.token_policy);
    let state = AppState {
        engine: Arc::new(engine),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Issue a GET request against the router.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Issue a POST request with a JSON body against the router.
pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    post_raw(app, uri, body.to_string()).await
}

/// Issue a POST request with an arbitrary body declared as JSON.
pub async fn post_raw(app: Router, uri: &str, body: String) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
