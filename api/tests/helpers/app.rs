use api::{routes::routes, state::AppState, ws::ws_routes};
use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode},
};
use chrono::{Datelike, Local};
use db::test_utils::setup_test_db;
use serde_json::Value;
use services::code_rotator::{CodeRotator, SequenceCodeSource};
use services::device_binding::Student;
use services::fingerprint::StaticFingerprintResolver;
use services::schedule::{OverlapPolicy, ScheduleResolver, TimetableEntry};
use services::{attendance::AttendanceRecorder, session::SessionManager};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use util::ws::WebSocketManager;

/// Device registered as "AA:BB".
pub const PHONE_A: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
/// Device registered as "CC:DD".
pub const PHONE_B: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));
/// Not in the ARP table.
pub const UNKNOWN_DEVICE: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 9));

/// Codes never rotate on their own during a test; the first one issued is "ZP-4821".
pub async fn make_test_app() -> (Router, AppState) {
    let db = setup_test_db().await;
    let ws = WebSocketManager::new();
    let sessions = SessionManager::new(
        db.clone(),
        ws.clone(),
        ScheduleResolver::new(db.clone(), OverlapPolicy::First),
        AttendanceRecorder::new(db.clone()),
        CodeRotator::new(
            Arc::new(SequenceCodeSource::new(["ZP-4821", "ZP-5902", "ZP-6310"])),
            Duration::from_secs(3600),
        ),
    );
    let fingerprints = StaticFingerprintResolver::new()
        .with(PHONE_A, "AA:BB")
        .with(PHONE_B, "CC:DD")
        .with(IpAddr::V4(Ipv4Addr::LOCALHOST), "00-11-22-33-44-55");

    let state = AppState::new(db, ws, sessions, Arc::new(fingerprints));
    let app = Router::new()
        .nest("/api", routes(state.clone()))
        .nest("/ws", ws_routes(state.clone()));
    (app, state)
}

/// Three students in SY-CS-A and a "Java Programming" slot covering all of today.
pub async fn seed_classroom(state: &AppState) {
    let db = state.db();
    for (roll, name) in [("101", "Rahul Verma"), ("102", "Amit Patel"), ("103", "Priya Sharma")] {
        Student::create(db, roll, name, Some("SY-CS-A"), None)
            .await
            .unwrap();
    }
    let today = Local::now().weekday().num_days_from_sunday() as i32;
    TimetableEntry::create(db, "SY-CS-A", today, "00:00", "23:59", "Java Programming", "Prof. Smith")
        .await
        .unwrap();
}

/// Sends a JSON POST as if it came from `from`.
pub async fn post_json(app: &Router, uri: &str, body: Value, from: IpAddr) -> (StatusCode, Value) {
    let mut req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    req.extensions_mut()
        .insert(ConnectInfo(SocketAddr::new(from, 40000)));

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}
