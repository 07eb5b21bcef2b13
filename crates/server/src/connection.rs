//! Per-client pull loop

use anyhow::Result;
use autoreload_core::ChangeQueue;
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Handle a single client through handshake, pull loop and disconnect.
///
/// Errors end this connection only.
pub async fn serve(
    stream: TcpStream,
    peer: SocketAddr,
    queue: Arc<ChangeQueue>,
    shutdown: CancellationToken,
) {
    let ws = tokio::select! {
        _ = shutdown.cancelled() => return,
        handshake = tokio_tungstenite::accept_async(stream) => match handshake {
            Ok(ws) => ws,
            Err(e) => {
                debug!(peer = %peer, error = %e, "websocket handshake failed");
                return;
            }
        },
    };

    info!(peer = %peer, "client connected");

    match pull_loop(ws, &queue, &shutdown).await {
        Ok(()) => info!(peer = %peer, "client disconnected"),
        Err(e) => info!(peer = %peer, error = %e, "client connection closed"),
    }
}

/// Answer every data frame from the client with one queued change
///
/// Frame content is ignored. Pulls that arrive while an earlier one is still
/// waiting are counted and answered in turn.
async fn pull_loop(
    mut ws: WebSocketStream<TcpStream>,
    queue: &ChangeQueue,
    shutdown: &CancellationToken,
) -> Result<()> {
    let mut pending_pulls: usize = 0;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                let _ = ws.close(None).await;
                return Ok(());
            }
            incoming = ws.next() => match incoming {
                Some(Ok(Message::Text(_) | Message::Binary(_))) => {
                    pending_pulls += 1;
                    trace!(pending_pulls, "pull received");
                }
                Some(Ok(Message::Close(_))) | None => return Ok(()),
                // ping/pong are answered by tungstenite
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
            },
            event = queue.pop(), if pending_pulls > 0 => {
                pending_pulls -= 1;

                let notification = event.notification();
                let text = notification.to_json()?;

                if let Err(e) = ws.send(Message::Text(text)).await {
                    warn!(path = %event.path.display(), "client gone before delivery, change dropped");
                    return Err(e.into());
                }

                debug!(event = ?notification, "sent event");
            }
        }
    }
}
