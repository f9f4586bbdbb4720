//! Integration tests for the `/presence` endpoints.
//!
//! Every response, success or failure, must use the `{ ok, data }` /
//! `{ ok, error }` envelope.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, build_test_app, get, post_json, post_raw};
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn generate(app: &Router, course: &str, session: &str, ts: &str) -> Value {
    let response = post_json(
        app.clone(),
        "/presence/qr/generate",
        json!({ "course_id": course, "session_id": session, "ts": ts }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

fn check_in_body(user: &str, course: &str, session: &str, token: &str, ts: &str) -> Value {
    json!({
        "user_id": user,
        "device_id": format!("dev-{user}"),
        "course_id": course,
        "session_id": session,
        "qr_token": token,
        "ts": ts,
    })
}

async fn check_in(app: &Router, body: Value) -> (StatusCode, Value) {
    let response = post_json(app.clone(), "/presence/checkin", body).await;
    let status = response.status();
    (status, body_json(response).await)
}

// ---------------------------------------------------------------------------
// Test: full walkthrough
// ---------------------------------------------------------------------------

#[tokio::test]
async fn walkthrough_generate_check_in_repeat_and_status() {
    let app = build_test_app();

    let generated = generate(&app, "cloud-101", "sesi-02", "2024-01-01T10:00:00Z").await;
    assert_eq!(generated["ok"], true);
    assert_eq!(generated["data"]["expires_at"], "2024-01-01T10:02:00Z");
    let token = generated["data"]["qr_token"].as_str().unwrap().to_string();

    let body = check_in_body("u1", "cloud-101", "sesi-02", &token, "2024-01-01T10:01:00Z");
    let (status, json) = check_in(&app, body.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({ "ok": true, "data": { "presence_id": "PR-0001", "status": "checked_in" } })
    );

    let (status, json) = check_in(&app, body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json, json!({ "ok": false, "error": "token_already_used" }));

    let response = get(
        app.clone(),
        "/presence/status?user_id=u1&course_id=cloud-101&session_id=sesi-02",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json,
        json!({
            "ok": true,
            "data": {
                "user_id": "u1",
                "course_id": "cloud-101",
                "session_id": "sesi-02",
                "status": "checked_in",
                "last_ts": "2024-01-01T10:01:00Z",
            }
        })
    );
}

// ---------------------------------------------------------------------------
// Test: generation errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn generate_missing_field_is_named() {
    let app = build_test_app();
    let response = post_json(
        app,
        "/presence/qr/generate",
        json!({ "course_id": "cloud-101", "ts": "2024-01-01T10:00:00Z" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json, json!({ "ok": false, "error": "missing_field: session_id" }));
}

#[tokio::test]
async fn generate_invalid_timestamp() {
    let app = build_test_app();
    let response = post_json(
        app,
        "/presence/qr/generate",
        json!({ "course_id": "cloud-101", "session_id": "sesi-02", "ts": "tomorrow" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "invalid_ts");
}

#[tokio::test]
async fn generate_numeric_timestamp_is_invalid_ts() {
    let app = build_test_app();
    let response = post_json(
        app,
        "/presence/qr/generate",
        json!({ "course_id": "cloud-101", "session_id": "sesi-02", "ts": 1704103200 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "ok": false, "error": "invalid_ts" })
    );
}

#[tokio::test]
async fn numeric_ids_are_accepted_as_text() {
    let app = build_test_app();
    let response = post_json(
        app.clone(),
        "/presence/qr/generate",
        json!({ "course_id": 101, "session_id": 2, "ts": "2024-01-01T10:00:00Z" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let generated = body_json(response).await;
    let token = generated["data"]["qr_token"].as_str().unwrap();

    let body = json!({
        "user_id": 7,
        "device_id": "dev-7",
        "course_id": "101",
        "session_id": 2,
        "qr_token": token,
        "ts": "2024-01-01T10:01:00Z",
    });
    let (status, json) = check_in(&app, body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "checked_in");

    let json = body_json(get(app, "/presence/status?user_id=7&course_id=101&session_id=2").await).await;
    assert_eq!(json["data"]["status"], "checked_in");
}

#[tokio::test]
async fn malformed_json_still_uses_envelope() {
    let app = build_test_app();
    let response = post_raw(app, "/presence/qr/generate", "{not json".to_string()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["ok"], false);
    assert!(json["error"].as_str().unwrap().starts_with("bad_request: "));
    assert!(json.get("data").is_none());
}

// ---------------------------------------------------------------------------
// Test: check-in validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn check_in_missing_device_id() {
    let app = build_test_app();
    let mut body = check_in_body("u1", "cloud-101", "sesi-02", "QR-x", "2024-01-01T10:00:00Z");
    body.as_object_mut().unwrap().remove("device_id");

    let (status, json) = check_in(&app, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "missing_field: device_id");
}

#[tokio::test]
async fn check_in_unknown_token() {
    let app = build_test_app();
    let body = check_in_body("u1", "cloud-101", "sesi-02", "QR-unknown", "2024-01-01T10:00:00Z");

    let (status, json) = check_in(&app, body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json, json!({ "ok": false, "error": "token_invalid" }));
}

#[tokio::test]
async fn check_in_other_session_is_token_invalid() {
    let app = build_test_app();
    let generated = generate(&app, "course_a", "session_x", "2024-01-01T10:00:00Z").await;
    let token = generated["data"]["qr_token"].as_str().unwrap();

    for (course, session) in [("course_a", "session_y"), ("course_b", "session_x")] {
        let body = check_in_body("u1", course, session, token, "2024-01-01T10:00:30Z");
        let (_, json) = check_in(&app, body).await;
        assert_eq!(json["error"], "token_invalid");
    }
}

#[tokio::test]
async fn check_in_after_expiry() {
    let app = build_test_app();
    let generated = generate(&app, "cloud-101", "sesi-02", "2024-01-01T10:00:00Z").await;
    let token = generated["data"]["qr_token"].as_str().unwrap();

    let body = check_in_body("u1", "cloud-101", "sesi-02", token, "2024-01-01T10:02:01Z");
    let (status, json) = check_in(&app, body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "token_expired");
}

#[tokio::test]
async fn check_in_accepts_scanned_deep_link() {
    let app = build_test_app();
    let generated = generate(&app, "cloud-101", "sesi-02", "2024-01-01T10:00:00Z").await;
    let token = generated["data"]["qr_token"].as_str().unwrap();
    let scanned = format!("https://portal.example/presence/scan?token={token}");

    let body = check_in_body("u1", "cloud-101", "sesi-02", &scanned, "2024-01-01T10:00:20Z");
    let (status, json) = check_in(&app, body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "checked_in");
}

#[tokio::test]
async fn second_token_keeps_presence_id() {
    let app = build_test_app();
    let t1 = generate(&app, "cloud-101", "sesi-02", "2024-01-01T10:00:00Z").await;
    let t2 = generate(&app, "cloud-101", "sesi-02", "2024-01-01T10:01:00Z").await;

    let (_, first) = check_in(
        &app,
        check_in_body(
            "u1",
            "cloud-101",
            "sesi-02",
            t1["data"]["qr_token"].as_str().unwrap(),
            "2024-01-01T10:00:30Z",
        ),
    )
    .await;
    let (_, second) = check_in(
        &app,
        check_in_body(
            "u1",
            "cloud-101",
            "sesi-02",
            t2["data"]["qr_token"].as_str().unwrap(),
            "2024-01-01T10:01:30Z",
        ),
    )
    .await;
    assert_eq!(first["data"]["presence_id"], second["data"]["presence_id"]);

    let json = body_json(
        get(
            app.clone(),
            "/presence/status?user_id=u1&course_id=cloud-101&session_id=sesi-02",
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["last_ts"], "2024-01-01T10:01:30Z");
}

// ---------------------------------------------------------------------------
// Test: status and listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn status_without_check_in_is_ok() {
    let app = build_test_app();
    let response = get(
        app,
        "/presence/status?user_id=u9&course_id=cloud-101&session_id=sesi-02",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["ok"], true);
    assert_eq!(json["data"]["status"], "not_checked_in");
    assert!(json["data"]["last_ts"].is_null());
}

#[tokio::test]
async fn status_missing_field() {
    let app = build_test_app();
    let response = get(app, "/presence/status?user_id=u1&course_id=cloud-101").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "missing_field: session_id");
}

#[tokio::test]
async fn list_returns_session_records_latest_first() {
    let app = build_test_app();
    for (user, ts) in [("u1", "2024-01-01T10:00:10Z"), ("u2", "2024-01-01T10:00:20Z")] {
        let generated = generate(&app, "cloud-101", "sesi-02", "2024-01-01T10:00:00Z").await;
        let token = generated["data"]["qr_token"].as_str().unwrap();
        let (status, _) = check_in(&app, check_in_body(user, "cloud-101", "sesi-02", token, ts)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let response = get(app.clone(), "/presence/list?course_id=cloud-101&session_id=sesi-02").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let records = json["data"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["user_id"], "u2");
    assert_eq!(records[0]["device_id"], "dev-u2");
    assert_eq!(records[1]["user_id"], "u1");

    let limited = body_json(
        get(app, "/presence/list?course_id=cloud-101&session_id=sesi-02&limit=1").await,
    )
    .await;
    assert_eq!(limited["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn list_with_non_numeric_limit_is_validation_error() {
    let app = build_test_app();
    let response = get(app, "/presence/list?course_id=c&session_id=s&limit=lots").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["ok"], false);
    assert!(json["error"].as_str().unwrap().starts_with("validation_error: "));
}

#[tokio::test]
async fn list_with_blank_limit_uses_default() {
    let app = build_test_app();
    let response = get(app, "/presence/list?course_id=c&session_id=s&limit=").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "ok": true, "data": [] }));
}

// ---------------------------------------------------------------------------
// Test: token inspection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn token_status_reports_binding_and_use() {
    let app = build_test_app();
    let generated = generate(&app, "cloud-101", "sesi-02", "2024-01-01T10:00:00Z").await;
    let token = generated["data"]["qr_token"].as_str().unwrap().to_string();

    let json = body_json(get(app.clone(), &format!("/presence/qr/status?qr_token={token}")).await).await;
    assert_eq!(json["ok"], true);
    assert_eq!(json["data"]["course_id"], "cloud-101");
    assert_eq!(json["data"]["used"], false);
    // Issued in the past relative to the wall clock, so already expired.
    assert_eq!(json["data"]["band"], "expired");
    assert_eq!(json["data"]["remaining_secs"], 0);

    let missing = get(app, "/presence/qr/status").await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(missing).await["error"], "missing_field: qr_token");
}
