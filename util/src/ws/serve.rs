use axum::extract::ws::{Message, WebSocket};
use bytes::Bytes;
use chrono::Utc;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{broadcast::error::RecvError, mpsc};

use super::WebSocketManager;
use super::handler_trait::WsHandler;
use super::runtime::WsContext;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

pub struct WsServerOptions {
    pub ws_ping_sec: u64,
    pub enable_app_ping: bool,
}

impl Default for WsServerOptions {
    fn default() -> Self {
        Self {
            ws_ping_sec: 30,
            enable_app_ping: true,
        }
    }
}

/// Serves one WebSocket connection attached to `topic` until the client
/// goes away.
///
/// Broadcasts on the topic are forwarded to the client, text frames are
/// parsed into `H::In` and dispatched in arrival order, and `on_close` runs
/// exactly once at the end regardless of how the connection ended.
pub async fn serve_topic<H: WsHandler>(
    socket: WebSocket,
    manager: WebSocketManager,
    topic: String,
    handler: Arc<H>,
    opts: WsServerOptions,
) {
    let connection_id = NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed);
    let mut rx = manager.subscribe(&topic).await;

    let (mut sink, mut socket_rx) = socket.split();

    // Outbound queue and writer task
    let (out_tx, mut out_rx) = mpsc::channel::<Message>(64);
    let writer_task = tokio::spawn(async move {
        while let Some(frame) = out_rx.recv().await {
            if sink.send(frame).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    // S→C: forward broadcasts on this topic
    let forward_task = {
        let out_tx = out_tx.clone();
        let topic = topic.clone();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(msg) => {
                        if out_tx.send(Message::Text(msg.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Connection lagging on '{topic}', skipped {skipped} frames");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    };

    let ping_task = {
        let out_tx = out_tx.clone();
        let period = Duration::from_secs(opts.ws_ping_sec.max(1));
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(period).await;
                if out_tx.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
            }
        })
    };

    let ctx = WsContext::new(topic.clone(), connection_id, out_tx);
    tracing::info!(connection_id, "WS connection opened on '{topic}'");
    handler.on_open(&ctx).await;

    // C→S: parse & dispatch
    while let Some(frame) = socket_rx.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                let raw = text.as_str();
                if opts.enable_app_ping && is_app_ping(raw) {
                    let pong = serde_json::json!({
                        "event": "pong",
                        "topic": ctx.topic,
                        "payload": {},
                        "ts": Utc::now().to_rfc3339(),
                    });
                    let _ = ctx.reply_text(pong.to_string()).await;
                    continue;
                }
                match serde_json::from_str::<H::In>(raw) {
                    Ok(parsed) => handler.on_message(&ctx, parsed).await,
                    Err(e) => tracing::warn!("WS invalid message on '{}': {e}; raw={raw}", ctx.topic),
                }
            }
            Ok(Message::Ping(payload)) => {
                let _ = ctx.reply_pong(payload).await;
            }
            Ok(Message::Pong(_)) => {}
            Ok(Message::Binary(_)) => {
                tracing::warn!("Ignoring binary frame on topic '{}'", ctx.topic);
            }
            Ok(Message::Close(_)) => break,
            Err(e) => {
                tracing::debug!(connection_id, "WS transport error on '{topic}': {e}");
                break;
            }
        }
    }

    handler.on_close(&ctx).await;

    forward_task.abort();
    ping_task.abort();
    let _ = forward_task.await;
    let _ = ping_task.await;
    // Last sender gone: the writer drains what is queued and exits.
    drop(ctx);
    let _ = writer_task.await;

    tracing::info!(connection_id, "WS connection closed on '{topic}'");
}

fn is_app_ping(raw: &str) -> bool {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(raw) {
        if let Some(Value::String(t)) = map.get("type") {
            return t == "ping";
        }
    }
    false
}
