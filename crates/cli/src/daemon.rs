//! Daemon lifecycle management
//!
//! Startup order: validate config, start the watcher, bind the server.
//! Shutdown on interrupt: cancel the server, stop the watcher and join its
//! worker. The caller exits the process right after.

use anyhow::{Context, Result};
use autoreload_core::{ChangeQueue, Config};
use autoreload_server::NotificationServer;
use autoreload_watcher::{WatchOptions, Watcher};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Running watcher plus bound (not yet serving) notification server
pub struct Daemon {
    watcher: Watcher,
    server: NotificationServer,
    queue: Arc<ChangeQueue>,
    shutdown: CancellationToken,
}

impl Daemon {
    /// Start the watcher and bind the server
    ///
    /// Any error here is fatal for the process.
    pub async fn start(config: &Config) -> Result<Self> {
        config.validate().context("Invalid configuration")?;

        let queue = Arc::new(ChangeQueue::new());

        info!("starting watcher...");
        let options = WatchOptions {
            debounce: config.debounce,
            recursive: config.recursive,
        };
        let mut watcher = Watcher::new(&config.watched, options, queue.clone())?;
        watcher.start()?;

        let server = NotificationServer::bind(&config.hosts, config.port, queue.clone())
            .await
            .context("Failed to start websocket server")?;

        Ok(Self {
            watcher,
            server,
            queue,
            shutdown: CancellationToken::new(),
        })
    }

    /// Addresses the server listens on
    pub fn local_addrs(&self) -> Vec<SocketAddr> {
        self.server.local_addrs()
    }

    /// Shared change queue
    pub fn queue(&self) -> Arc<ChangeQueue> {
        self.queue.clone()
    }

    /// Serve until `interrupt` resolves, then shut down
    ///
    /// Returns once the watch worker has been joined.
    pub async fn run_until<F>(self, interrupt: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let Daemon {
            mut watcher,
            server,
            shutdown,
            ..
        } = self;

        tokio::select! {
            result = server.run(shutdown.clone()) => {
                // Only reachable if every listener died
                result?;
            }
            _ = interrupt => {
                info!("interrupt received, exiting gracefully..");
            }
        }

        shutdown.cancel();

        tokio::task::spawn_blocking(move || watcher.stop())
            .await
            .context("Watcher shutdown task failed")??;

        info!("watcher cleaned up, exiting.");
        Ok(())
    }
}

/// Run until Ctrl-C
pub async fn run(config: Config) -> Result<()> {
    // Installed before anything listens so an early Ctrl-C is not lost
    let interrupt = interrupt_signal()?;

    let daemon = Daemon::start(&config).await?;
    daemon.run_until(interrupt).await
}

#[cfg(unix)]
fn interrupt_signal() -> Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint =
        signal(SignalKind::interrupt()).context("Failed to install interrupt handler")?;
    Ok(async move {
        sigint.recv().await;
    })
}

#[cfg(not(unix))]
fn interrupt_signal() -> Result<impl Future<Output = ()>> {
    Ok(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for interrupt");
            std::future::pending::<()>().await;
        }
    })
}
