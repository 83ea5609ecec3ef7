use crate::response::ApiResponse;
use axum::{Json, Router, response::IntoResponse, routing::get};

/// `GET /health` for uptime checks and load balancer probes.
pub fn health_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/", get(health_check))
}

async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::success("OK", "Health check passed"))
}
