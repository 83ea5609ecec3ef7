use crate::helpers::{make_test_app, seed_classroom};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::Local;
use serde_json::Value;
use tower::ServiceExt;

async fn get_status(app: &Router) -> Value {
    let req = Request::builder()
        .method("GET")
        .uri("/api/session")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn status_follows_the_session_and_hides_the_code() {
    let (app, state) = make_test_app().await;
    seed_classroom(&state).await;

    let idle = get_status(&app).await;
    assert_eq!(idle["data"]["active"], false);
    assert!(idle["data"]["subject"].is_null());

    state
        .sessions()
        .start_session(1, "SY-CS-A", Local::now().naive_local())
        .await
        .unwrap();
    let live = get_status(&app).await;
    assert_eq!(live["data"]["active"], true);
    assert_eq!(live["data"]["subject"], "Java Programming");
    assert_eq!(live["data"]["lecturerName"], "Prof. Smith");
    assert!(!live.to_string().contains("ZP-4821"));

    state.sessions().end_session().await;
    assert_eq!(get_status(&app).await["data"]["active"], false);
}
