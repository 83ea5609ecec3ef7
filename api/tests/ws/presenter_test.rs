use crate::helpers::app::{PHONE_A, PHONE_B};
use crate::helpers::{
    connect_presenter, make_test_app, next_event, post_json, seed_classroom, spawn_server,
};
use axum::http::StatusCode;
use db::models::attendance_record::Model as AttendanceRecord;
use futures_util::SinkExt;
use serde_json::json;
use serial_test::serial;
use services::device_binding::Student;
use std::time::Duration;
use tokio_tungstenite::tungstenite::protocol::Message;

fn command(v: serde_json::Value) -> Message {
    Message::Text(v.to_string().into())
}

#[tokio::test]
#[serial]
async fn presenter_starts_session_and_sees_roster_and_code() {
    let (app, state) = make_test_app().await;
    seed_classroom(&state).await;
    let addr = spawn_server(app).await;

    let mut presenter = connect_presenter(addr).await;
    presenter
        .send(command(json!({"type": "startSession", "room": "SY-CS-A"})))
        .await
        .unwrap();

    let started = next_event(&mut presenter, "sessionStarted").await;
    assert_eq!(started["topic"], "attendance:live");
    assert_eq!(started["payload"]["subject"], "Java Programming");
    assert_eq!(started["payload"]["lecturerName"], "Prof. Smith");
    assert_eq!(started["payload"]["roster"].as_array().unwrap().len(), 3);

    let code = next_event(&mut presenter, "newQRCode").await;
    assert_eq!(code["payload"]["code"], "ZP-4821");

    presenter
        .send(command(json!({"type": "markManual", "rollNumber": "103"})))
        .await
        .unwrap();
    let marked = next_event(&mut presenter, "studentMarked").await;
    assert_eq!(marked["payload"]["rollNumber"], "103");
    assert_eq!(marked["payload"]["method"], "manual");
}

#[tokio::test]
#[serial]
async fn unscheduled_room_gets_session_error() {
    let (app, state) = make_test_app().await;
    seed_classroom(&state).await;
    let addr = spawn_server(app).await;

    let mut presenter = connect_presenter(addr).await;
    presenter
        .send(command(json!({"type": "startSession", "room": "LAB-9"})))
        .await
        .unwrap();

    let err = next_event(&mut presenter, "sessionError").await;
    assert_eq!(err["payload"]["command"], "startSession");
    assert_eq!(err["payload"]["message"], "No scheduled lecture for LAB-9 at this time.");
    assert!(state.sessions().snapshot().await.is_none());
}

#[tokio::test]
#[serial]
async fn second_presenter_cannot_take_over() {
    let (app, state) = make_test_app().await;
    seed_classroom(&state).await;
    let addr = spawn_server(app).await;

    let mut owner = connect_presenter(addr).await;
    owner
        .send(command(json!({"type": "startSession", "room": "SY-CS-A"})))
        .await
        .unwrap();
    next_event(&mut owner, "sessionStarted").await;

    let mut other = connect_presenter(addr).await;
    other
        .send(command(json!({"type": "startSession", "room": "SY-CS-A"})))
        .await
        .unwrap();
    let err = next_event(&mut other, "sessionError").await;
    assert_eq!(err["payload"]["message"], "Another presenter is running the active session.");

    other
        .send(command(json!({"type": "closeSession"})))
        .await
        .unwrap();
    next_event(&mut other, "commandError").await;
    assert!(state.sessions().snapshot().await.is_some());

    owner
        .send(command(json!({"type": "closeSession"})))
        .await
        .unwrap();
    next_event(&mut other, "sessionClosed").await;
    assert!(state.sessions().snapshot().await.is_none());
}

#[tokio::test]
#[serial]
async fn owner_disconnect_tears_session_down() {
    let (app, state) = make_test_app().await;
    seed_classroom(&state).await;
    let addr = spawn_server(app).await;

    let mut owner = connect_presenter(addr).await;
    owner
        .send(command(json!({"type": "startSession", "room": "SY-CS-A"})))
        .await
        .unwrap();
    next_event(&mut owner, "newQRCode").await;
    assert!(state.sessions().snapshot().await.is_some());

    let mut observer = connect_presenter(addr).await;
    // A pong proves the observer is subscribed before the owner leaves.
    observer.send(command(json!({"type": "ping"}))).await.unwrap();
    next_event(&mut observer, "pong").await;

    owner.close(None).await.unwrap();
    drop(owner);

    next_event(&mut observer, "sessionClosed").await;
    let mut waited = Duration::ZERO;
    while state.sessions().snapshot().await.is_some() && waited < Duration::from_secs(2) {
        tokio::time::sleep(Duration::from_millis(20)).await;
        waited += Duration::from_millis(20);
    }
    assert!(state.sessions().snapshot().await.is_none());
}

#[tokio::test]
#[serial]
async fn reset_device_reports_unknown_students() {
    let (app, state) = make_test_app().await;
    seed_classroom(&state).await;
    let addr = spawn_server(app).await;
    let mut presenter = connect_presenter(addr).await;
    presenter
        .send(command(json!({"type": "startSession", "room": "SY-CS-A"})))
        .await
        .unwrap();
    next_event(&mut presenter, "sessionStarted").await;

    presenter
        .send(command(json!({"type": "resetDevice", "rollNumber": "999"})))
        .await
        .unwrap();
    let err = next_event(&mut presenter, "commandError").await;
    assert_eq!(err["payload"]["command"], "resetDevice");

    presenter
        .send(command(json!({"type": "resetDevice", "rollNumber": "101"})))
        .await
        .unwrap();
    let ok = next_event(&mut presenter, "deviceReset").await;
    assert_eq!(ok["payload"]["rollNumber"], "101");
}

#[tokio::test]
#[serial]
async fn reset_device_needs_the_session_owner() {
    let (app, state) = make_test_app().await;
    seed_classroom(&state).await;
    let addr = spawn_server(app.clone()).await;

    post_json(&app, "/api/login", json!({"rollNumber": "101"}), PHONE_A).await;
    let (status, _) = post_json(&app, "/api/login", json!({"rollNumber": "101"}), PHONE_B).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // No session at all.
    let mut stranger = connect_presenter(addr).await;
    stranger
        .send(command(json!({"type": "resetDevice", "rollNumber": "101"})))
        .await
        .unwrap();
    let err = next_event(&mut stranger, "commandError").await;
    assert_eq!(err["payload"]["message"], "No active lecture session!");

    // Someone else's session.
    let mut owner = connect_presenter(addr).await;
    owner
        .send(command(json!({"type": "startSession", "room": "SY-CS-A"})))
        .await
        .unwrap();
    next_event(&mut owner, "sessionStarted").await;
    stranger
        .send(command(json!({"type": "resetDevice", "rollNumber": "101"})))
        .await
        .unwrap();
    let err = next_event(&mut stranger, "commandError").await;
    assert_eq!(err["payload"]["message"], "Another presenter is running the active session.");

    let (status, _) = post_json(&app, "/api/login", json!({"rollNumber": "101"}), PHONE_B).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let stored = Student::find_by_roll_number(state.db(), "101")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.device_fingerprint.as_deref(), Some("AA:BB"));
}

#[tokio::test]
#[serial]
async fn mark_manual_needs_the_session_owner() {
    let (app, state) = make_test_app().await;
    seed_classroom(&state).await;
    let addr = spawn_server(app).await;

    let mut owner = connect_presenter(addr).await;
    owner
        .send(command(json!({"type": "startSession", "room": "SY-CS-A"})))
        .await
        .unwrap();
    next_event(&mut owner, "sessionStarted").await;

    let mut stranger = connect_presenter(addr).await;
    stranger
        .send(command(json!({"type": "markManual", "rollNumber": "103"})))
        .await
        .unwrap();
    let err = next_event(&mut stranger, "commandError").await;
    assert_eq!(err["payload"]["command"], "markManual");
    assert_eq!(err["payload"]["message"], "Another presenter is running the active session.");
    assert!(
        AttendanceRecord::find_one_for(state.db(), "103", "Java Programming")
            .await
            .unwrap()
            .is_none()
    );

    owner
        .send(command(json!({"type": "markManual", "rollNumber": "103"})))
        .await
        .unwrap();
    let marked = next_event(&mut stranger, "studentMarked").await;
    assert_eq!(marked["payload"]["rollNumber"], "103");
}
