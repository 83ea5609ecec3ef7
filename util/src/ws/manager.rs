//! A thread-safe WebSocket manager for topic-based message broadcasting.
//!
//! Uses Tokio broadcast channels per topic.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

type Topic = String;
type Sender = broadcast::Sender<String>;
type Receiver = broadcast::Receiver<String>;

const TOPIC_CAPACITY: usize = 100;

/// Manages broadcast channels per topic.
///
/// - Lazily creates a broadcast channel per topic on first subscription
/// - Drops a topic when a broadcast finds no receivers left
#[derive(Clone, Default)]
pub struct WebSocketManager {
    inner: Arc<RwLock<HashMap<Topic, Sender>>>,
}

impl WebSocketManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to the given topic, creating it if necessary.
    pub async fn subscribe(&self, topic: &str) -> Receiver {
        let mut map = self.inner.write().await;
        map.entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(TOPIC_CAPACITY).0)
            .subscribe()
    }

    /// Broadcasts a message to all subscribers of `topic`.
    ///
    /// No-op when the topic does not exist. A topic whose receivers have all
    /// gone away is removed.
    pub async fn broadcast<T: Into<String>>(&self, topic: &str, msg: T) {
        let mut map = self.inner.write().await;
        if let Some(sender) = map.get(topic) {
            let _ = sender.send(msg.into());
            if sender.receiver_count() == 0 {
                tracing::debug!("Removing topic '{topic}' due to no subscribers.");
                map.remove(topic);
            }
        }
    }
}
