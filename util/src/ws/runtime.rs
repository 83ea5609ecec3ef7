use axum::extract::ws::{Message, Utf8Bytes};
use serde::Serialize;
use tokio::sync::mpsc;

/// Per-connection handle given to a [`super::handler_trait::WsHandler`].
pub struct WsContext {
    pub topic: String,
    pub connection_id: u64,
    out_tx: mpsc::Sender<Message>,
}

impl WsContext {
    pub fn new(
        topic: String,
        connection_id: u64,
        out_tx: mpsc::Sender<Message>,
    ) -> Self {
        Self {
            topic,
            connection_id,
            out_tx,
        }
    }

    /// Send a single text frame to this client only.
    pub async fn reply_text(&self, text: impl Into<Utf8Bytes>) -> Result<(), ()> {
        self.out_tx
            .send(Message::Text(text.into()))
            .await
            .map_err(|_| ())
    }

    /// Send an enveloped event to this client only.
    pub async fn reply_event<T: Serialize>(&self, event: &str, payload: &T) -> Result<(), ()> {
        match crate::ws::envelope(&self.topic, event, payload) {
            Some(json) => self.reply_text(json).await,
            None => Err(()),
        }
    }

    pub async fn reply_pong(&self, payload: bytes::Bytes) -> Result<(), ()> {
        self.out_tx
            .send(Message::Pong(payload))
            .await
            .map_err(|_| ())
    }
}
