use crate::helpers::make_test_app;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use serial_test::serial;
use tower::ServiceExt;

#[tokio::test]
#[serial]
async fn health_check_returns_ok_json() {
    let (app, _) = make_test_app().await;

    let req = Request::builder()
        .method("GET")
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["data"], "OK");
}
