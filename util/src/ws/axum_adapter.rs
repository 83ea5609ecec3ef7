use axum::extract::{WebSocketUpgrade, ws::WebSocket};
use axum::response::IntoResponse;
use std::sync::Arc;

use super::WebSocketManager;
use super::handler_trait::WsHandler;
use super::serve::{WsServerOptions, serve_topic};

/// Upgrades the request and hands the socket to [`serve_topic`].
pub fn ws_route<H, FTopic>(
    ws: WebSocketUpgrade,
    manager: WebSocketManager,
    topic_fn: FTopic,
    handler: Arc<H>,
    opts: WsServerOptions,
) -> impl IntoResponse
where
    H: WsHandler,
    FTopic: FnOnce() -> String + Send + 'static,
{
    ws.on_upgrade(move |socket: WebSocket| async move {
        let topic = topic_fn();
        serve_topic(socket, manager, topic, handler, opts).await;
    })
}
