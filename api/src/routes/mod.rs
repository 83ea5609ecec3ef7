//! HTTP route entry point for `/api/...`.
//!
//! - `/health` → health check
//! - `/login`, `/scan` → attendee device binding and attendance marking

use axum::Router;

use crate::routes::{attendance::attendance_routes, health::health_routes};
use crate::state::AppState;

pub mod attendance;
pub mod health;

pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .merge(attendance_routes())
        .with_state(app_state)
}
