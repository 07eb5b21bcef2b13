//! Common utilities for integration tests
#![allow(dead_code)]

pub mod process;

use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

#[allow(unused_imports)]
pub use process::AutoreloadProcess;

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A port that was free a moment ago
pub fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Wait until something accepts TCP connections on `addr`
pub async fn wait_until_listening(addr: &str, timeout: Duration) -> anyhow::Result<()> {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if TcpStream::connect(addr).await.is_ok() {
            return Ok(());
        }
        if tokio::time::Instant::now() >= deadline {
            anyhow::bail!("nothing listening on {} after {:?}", addr, timeout);
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

pub async fn connect(addr: &str) -> Client {
    let (ws, _) = connect_async(format!("ws://{}/", addr))
        .await
        .expect("ws connect failed");
    ws
}

/// Ask the server for one change
pub async fn pull(ws: &mut Client) {
    ws.send(Message::Text("ping".to_string())).await.unwrap();
}

/// Next notification as JSON, or None if nothing arrives within `wait`
pub async fn recv_within(ws: &mut Client, wait: Duration) -> Option<serde_json::Value> {
    let deadline = tokio::time::Instant::now() + wait;
    loop {
        let frame = tokio::time::timeout_at(deadline, ws.next()).await.ok()??;
        if let Message::Text(text) = frame.ok()? {
            return serde_json::from_str(&text).ok();
        }
    }
}
