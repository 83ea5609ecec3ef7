use axum::{
    extract::{State, WebSocketUpgrade},
    response::IntoResponse,
};
use services::session::LIVE_TOPIC;
use std::sync::Arc;
use util::config;
use util::ws::axum_adapter::ws_route;
use util::ws::serve::WsServerOptions;

use super::ws_handlers::PresenterWsHandler;
use crate::state::AppState;

pub async fn presenter_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let handler = Arc::new(PresenterWsHandler::new(state.clone()));
    let opts = WsServerOptions {
        ws_ping_sec: config::ws_ping_seconds(),
        ..Default::default()
    };

    ws_route(ws, state.ws().clone(), || LIVE_TOPIC.to_string(), handler, opts)
}
