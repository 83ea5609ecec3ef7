//! Attendee-facing routes.
//!
//! - `POST /login` binds (or checks) the caller's device
//! - `POST /scan` marks attendance with the code on the presenter screen
//! - `GET /session` says whether a lecture is running

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub mod common;
pub mod get;
pub mod post;

pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(post::login))
        .route("/scan", post(post::scan))
        .route("/session", get(get::session_status))
}
