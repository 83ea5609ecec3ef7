use crate::helpers::app::{PHONE_A, PHONE_B, UNKNOWN_DEVICE};
use crate::helpers::{make_test_app, post_json, seed_classroom};
use axum::http::StatusCode;
use chrono::Local;
use db::models::attendance_record::Model as AttendanceRecord;
use serde_json::{Value, json};
use services::session::LIVE_TOPIC;

#[tokio::test]
async fn scan_without_session_is_rejected() {
    let (app, _) = make_test_app().await;
    post_json(&app, "/api/login", json!({"rollNumber": "101"}), PHONE_A).await;

    let (status, body) = post_json(
        &app,
        "/api/scan",
        json!({"rollNumber": "101", "qrCode": "ZP-4821"}),
        PHONE_A,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No active lecture session!");
}

#[tokio::test]
async fn current_code_marks_once_and_stale_code_fails() {
    let (app, state) = make_test_app().await;
    seed_classroom(&state).await;
    let mut rx = state.ws().subscribe(LIVE_TOPIC).await;

    state
        .sessions()
        .start_session(1, "SY-CS-A", Local::now().naive_local())
        .await
        .unwrap();
    assert_eq!(state.sessions().snapshot().await.map(|s| s.code).as_deref(), Some("ZP-4821"));
    post_json(&app, "/api/login", json!({"rollNumber": "101"}), PHONE_A).await;

    let scan = json!({"rollNumber": "101", "qrCode": "ZP-4821"});
    let (status, body) = post_json(&app, "/api/scan", scan.clone(), PHONE_A).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Attendance marked for Java Programming");
    assert_eq!(body["data"]["alreadyPresent"], false);

    let (status, body) = post_json(&app, "/api/scan", scan, PHONE_A).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["alreadyPresent"], true);

    let (status, body) = post_json(
        &app,
        "/api/scan",
        json!({"rollNumber": "101", "qrCode": "ZP-1111"}),
        PHONE_A,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Expired or Invalid QR Code.");

    let mut marked = 0;
    while let Ok(raw) = rx.try_recv() {
        let v: Value = serde_json::from_str(&raw).unwrap();
        if v["event"] == "studentMarked" {
            assert_eq!(v["payload"]["rollNumber"], "101");
            marked += 1;
        }
    }
    assert_eq!(marked, 1);
}

#[tokio::test]
async fn valid_code_from_another_device_is_denied() {
    let (app, state) = make_test_app().await;
    seed_classroom(&state).await;
    state
        .sessions()
        .start_session(1, "SY-CS-A", Local::now().naive_local())
        .await
        .unwrap();
    post_json(&app, "/api/login", json!({"rollNumber": "102"}), PHONE_A).await;

    let (status, _) = post_json(
        &app,
        "/api/scan",
        json!({"rollNumber": "102", "qrCode": "ZP-4821"}),
        PHONE_B,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(
        AttendanceRecord::find_one_for(state.db(), "102", "Java Programming")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn scan_from_unidentifiable_device_is_rejected() {
    let (app, state) = make_test_app().await;
    seed_classroom(&state).await;
    state
        .sessions()
        .start_session(1, "SY-CS-A", Local::now().naive_local())
        .await
        .unwrap();

    let (status, body) = post_json(
        &app,
        "/api/scan",
        json!({"rollNumber": "101", "qrCode": "ZP-4821"}),
        UNKNOWN_DEVICE,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Could not identify device. Ensure you are on the local network."
    );
    assert!(
        AttendanceRecord::find_one_for(state.db(), "101", "Java Programming")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn surrounding_whitespace_in_code_is_ignored() {
    let (app, state) = make_test_app().await;
    seed_classroom(&state).await;
    state
        .sessions()
        .start_session(1, "SY-CS-A", Local::now().naive_local())
        .await
        .unwrap();
    post_json(&app, "/api/login", json!({"rollNumber": "103"}), PHONE_A).await;

    let (status, body) = post_json(
        &app,
        "/api/scan",
        json!({"rollNumber": "103", "qrCode": " ZP-4821\n"}),
        PHONE_A,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["alreadyPresent"], false);
}
