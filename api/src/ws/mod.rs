use axum::Router;

use crate::state::AppState;
use crate::ws::attendance::ws_attendance_routes;

pub mod attendance;

pub fn ws_routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/attendance", ws_attendance_routes())
        .with_state(app_state)
}
