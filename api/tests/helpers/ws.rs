use axum::Router;
use futures_util::StreamExt;
use serde_json::Value;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use url::Url;

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Spawns the app on a random local port, with peer addresses available
/// to `ConnectInfo`.
pub async fn spawn_server(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    addr
}

pub async fn connect_presenter(addr: SocketAddr) -> WsClient {
    let url = Url::parse(&format!("ws://{addr}/ws/attendance")).unwrap();
    let (ws, _) = connect_async(url.as_str()).await.unwrap();
    ws
}

/// Reads frames until an envelope with `event == name` arrives.
pub async fn next_event(ws: &mut WsClient, name: &str) -> Value {
    let deadline = Duration::from_secs(5);
    loop {
        let frame = tokio::time::timeout(deadline, ws.next())
            .await
            .unwrap_or_else(|_| panic!("timed out waiting for '{name}'"))
            .expect("socket closed")
            .expect("socket error");
        if let Message::Text(txt) = frame {
            let v: Value = serde_json::from_str(txt.as_str()).unwrap();
            if v["event"] == name {
                return v;
            }
        }
    }
}
