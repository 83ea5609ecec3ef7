//! Presenter channel at `/ws/attendance`.
//!
//! Every connection subscribes to the live attendance topic. Whichever
//! connection starts a session owns it until it closes the session or
//! disconnects.

use axum::{Router, routing::get};

use crate::state::AppState;

pub mod common;
pub mod handlers;
pub mod ws_handlers;

use handlers::presenter_ws_handler;

pub fn ws_attendance_routes() -> Router<AppState> {
    Router::new().route("/", get(presenter_ws_handler))
}
