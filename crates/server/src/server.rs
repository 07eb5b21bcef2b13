//! Listener setup and accept loops

use crate::connection;
use anyhow::{bail, Context, Result};
use autoreload_core::ChangeQueue;
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{lookup_host, TcpListener};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Bound when the host list is empty
const ALL_INTERFACES: &str = "0.0.0.0";

/// Pause after a failed accept (e.g. out of file descriptors)
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// WebSocket server handing queued changes to pulling clients
pub struct NotificationServer {
    listeners: Vec<TcpListener>,
    queue: Arc<ChangeQueue>,
}

impl NotificationServer {
    /// Bind every address the given hosts resolve to
    ///
    /// An empty host list binds all interfaces. Addresses that fail to bind
    /// are skipped; a host with no bindable address is an error.
    pub async fn bind(hosts: &[String], port: u16, queue: Arc<ChangeQueue>) -> Result<Self> {
        let hosts: Vec<&str> = if hosts.is_empty() {
            vec![ALL_INTERFACES]
        } else {
            hosts.iter().map(String::as_str).collect()
        };

        let mut listeners = Vec::new();
        let mut seen = HashSet::new();

        for host in hosts {
            let addrs = lookup_host((host, port))
                .await
                .with_context(|| format!("Failed to resolve host '{}'", host))?;

            let mut host_bound = false;
            for addr in addrs {
                if !seen.insert(addr) {
                    host_bound = true;
                    continue;
                }

                match TcpListener::bind(addr).await {
                    Ok(listener) => {
                        let local = listener.local_addr().unwrap_or(addr);
                        info!(addr = %local, "listening for websocket clients");
                        listeners.push(listener);
                        host_bound = true;
                    }
                    Err(e) => warn!(addr = %addr, error = %e, "failed to bind"),
                }
            }

            if !host_bound {
                bail!("Failed to bind {}:{}", host, port);
            }
        }

        Ok(Self { listeners, queue })
    }

    /// Addresses actually bound
    pub fn local_addrs(&self) -> Vec<SocketAddr> {
        self.listeners
            .iter()
            .filter_map(|listener| listener.local_addr().ok())
            .collect()
    }

    /// Serve clients until `shutdown` is cancelled
    pub async fn run(self, shutdown: CancellationToken) -> Result<()> {
        let mut accept_loops = JoinSet::new();
        for listener in self.listeners {
            accept_loops.spawn(accept_loop(listener, self.queue.clone(), shutdown.clone()));
        }

        while let Some(result) = accept_loops.join_next().await {
            if let Err(e) = result {
                if e.is_panic() {
                    bail!("accept loop panicked: {}", e);
                }
            }
        }

        info!("notification server stopped");
        Ok(())
    }
}

async fn accept_loop(listener: TcpListener, queue: Arc<ChangeQueue>, shutdown: CancellationToken) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    tokio::spawn(connection::serve(
                        stream,
                        peer,
                        queue.clone(),
                        shutdown.child_token(),
                    ));
                }
                Err(e) => {
                    warn!(error = %e, "failed to accept connection");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
            },
        }
    }
}
