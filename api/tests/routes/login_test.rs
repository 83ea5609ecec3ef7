use crate::helpers::app::{PHONE_A, PHONE_B, UNKNOWN_DEVICE};
use crate::helpers::{make_test_app, post_json};
use axum::http::StatusCode;
use serde_json::json;
use services::device_binding::Student;

#[tokio::test]
async fn first_login_binds_and_second_device_is_denied() {
    let (app, state) = make_test_app().await;

    let (status, body) = post_json(&app, "/api/login", json!({"rollNumber": "101"}), PHONE_A).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "First Login: Device Bound Successfully.");
    assert_eq!(body["data"]["firstBind"], true);

    let (status, body) = post_json(&app, "/api/login", json!({"rollNumber": "101"}), PHONE_A).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful. Proceed to scan.");
    assert_eq!(body["data"]["firstBind"], false);

    let (status, body) = post_json(&app, "/api/login", json!({"rollNumber": "101"}), PHONE_B).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "ACCESS DENIED: Device mismatch! Registered device only.");

    let stored = Student::find_by_roll_number(state.db(), "101")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.device_fingerprint.as_deref(), Some("AA:BB"));
    assert_eq!(stored.name, "Student 101");
}

#[tokio::test]
async fn unidentifiable_device_is_rejected_without_writing() {
    let (app, state) = make_test_app().await;

    let (status, body) =
        post_json(&app, "/api/login", json!({"rollNumber": "101"}), UNKNOWN_DEVICE).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Could not identify device. Ensure you are on the local network."
    );
    assert!(Student::find_by_roll_number(state.db(), "101").await.unwrap().is_none());
}

#[tokio::test]
async fn blank_roll_number_is_a_bad_request() {
    let (app, _) = make_test_app().await;
    let (status, body) = post_json(&app, "/api/login", json!({"rollNumber": "  "}), PHONE_A).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn reset_device_allows_a_new_phone() {
    let (app, state) = make_test_app().await;
    post_json(&app, "/api/login", json!({"rollNumber": "101"}), PHONE_A).await;

    state.binding().reset("101").await.unwrap();

    let (status, body) = post_json(&app, "/api/login", json!({"rollNumber": "101"}), PHONE_B).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["firstBind"], true);
}
