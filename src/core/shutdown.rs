//! Shutdown signalling for the publish and subscribe loops.
//!
//! A [`Shutdown`] owns a broadcast sender; each loop holds a
//! [`ShutdownListener`] and stops once anything arrives on it, or once every
//! sender is gone.

use tokio::signal;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info};

#[derive(Debug, Clone)]
pub struct Shutdown {
    sender: broadcast::Sender<()>,
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Shutdown {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self { sender }
    }

    /// Subscribe before triggering: signals sent earlier are not replayed.
    pub fn listen(&self) -> ShutdownListener {
        ShutdownListener {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn trigger(&self) {
        // No listeners left means nothing is running.
        let _ = self.sender.send(());
    }

    /// Spawns a task that triggers shutdown on SIGINT (Ctrl+C) or SIGTERM.
    pub fn monitor_signals(&self) -> JoinHandle<()> {
        let shutdown = self.clone();

        tokio::spawn(async move {
            let ctrl_c = async {
                if let Err(e) = signal::ctrl_c().await {
                    error!("Failed to listen for Ctrl+C: {e}");
                    std::future::pending::<()>().await;
                }
            };

            #[cfg(unix)]
            let terminate = async {
                match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                    Ok(mut sigterm) => {
                        sigterm.recv().await;
                    }
                    Err(e) => {
                        error!("Failed to install SIGTERM handler: {e}");
                        std::future::pending::<()>().await;
                    }
                }
            };

            #[cfg(not(unix))]
            let terminate = std::future::pending::<()>();

            tokio::select! {
                _ = ctrl_c => {
                    info!("Received SIGINT (Ctrl+C)");
                }
                _ = terminate => {
                    info!("Received SIGTERM");
                }
            }

            shutdown.trigger();
        })
    }
}

#[derive(Debug)]
pub struct ShutdownListener {
    receiver: broadcast::Receiver<()>,
}

impl ShutdownListener {
    /// Resolves once shutdown has been requested.
    pub async fn recv(&mut self) {
        // Closed and Lagged both mean a signal was sent or can no longer be.
        let _ = self.receiver.recv().await;
    }
}
