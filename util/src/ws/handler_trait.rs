use serde::de::DeserializeOwned;
use std::future::Future;

use super::runtime::WsContext;

pub trait WsHandler: Send + Sync + 'static {
    /// The incoming message type this handler understands (tagged enum recommended).
    type In: DeserializeOwned + Send;

    /// Called once after the socket is subscribed and registered on its topic.
    fn on_open(&self, ctx: &WsContext) -> impl Future<Output = ()> + Send {
        async move {
            let _ = ctx;
        }
    }

    /// Called for every parsed text message of type `Self::In`.
    fn on_message(&self, ctx: &WsContext, msg: Self::In) -> impl Future<Output = ()> + Send;

    /// Called exactly once when the connection ends, whether the client sent
    /// a close frame or the transport simply dropped.
    fn on_close(&self, ctx: &WsContext) -> impl Future<Output = ()> + Send {
        async move {
            let _ = ctx;
        }
    }
}
