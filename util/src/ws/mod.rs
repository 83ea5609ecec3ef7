pub mod axum_adapter;
pub mod handler_trait;
pub mod manager;
pub mod runtime;
pub mod serve;

pub use manager::WebSocketManager;

use chrono::Utc;
use serde::Serialize;

/// Standard event envelope sent over WebSocket topics.
#[derive(Serialize)]
pub struct EventEnvelope<'a, T> {
    #[serde(rename = "type")]
    pub r#type: &'static str,
    pub event: &'a str,
    pub topic: &'a str,
    pub payload: T,
    pub ts: String,
}

/// An event knows its stable wire name and the topic it belongs to.
pub trait Event: Serialize {
    const NAME: &'static str;
    fn topic_path(&self) -> String;
}

/// Serializes `payload` into an `EventEnvelope` without sending it.
pub fn envelope<T: Serialize>(topic: &str, event: &str, payload: &T) -> Option<String> {
    let env = EventEnvelope {
        r#type: "event",
        event,
        topic,
        payload,
        ts: Utc::now().to_rfc3339(),
    };
    match serde_json::to_string(&env) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!("Failed to serialize '{event}' for '{topic}': {e}");
            None
        }
    }
}

/// Broadcast a JSON-serialized `EventEnvelope` on `topic`.
pub async fn emit<T: Serialize>(ws: &WebSocketManager, topic: &str, event: &str, payload: &T) {
    if let Some(json) = envelope(topic, event, payload) {
        ws.broadcast(topic, json).await;
    }
}

/// Broadcast a typed [`Event`] on its own topic.
pub async fn emit_event<E: Event>(ws: &WebSocketManager, ev: &E) {
    let topic = ev.topic_path();
    emit(ws, &topic, E::NAME, ev).await;
}
