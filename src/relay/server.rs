//! Relay server: bounded accept loop over the record sink.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::{broadcast, Semaphore};
use tracing::{debug, error, info};

use crate::config::RelayConfig;
use crate::relay::connection;
use crate::store::RecordStore;

/// TCP service that receives submission payloads and persists them.
///
/// Concurrency is capped by a semaphore: a permit is acquired before
/// each accept and held for the connection's lifetime, so at most
/// `max_connections` receive loops run at once and further connections
/// queue in the OS backlog until a permit frees up.
pub struct RelayServer {
    config: RelayConfig,
    store: Arc<dyn RecordStore>,
}

impl RelayServer {
    pub fn new(config: RelayConfig, store: Arc<dyn RecordStore>) -> Self {
        Self { config, store }
    }

    /// Accept connections until the shutdown signal fires.
    ///
    /// Accept errors are logged and the loop continues; only shutdown
    /// (or the shutdown coordinator being dropped) stops the listener.
    /// In-flight connection tasks drain best-effort after return.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) {
        let limit = Arc::new(Semaphore::new(self.config.max_connections));
        match listener.local_addr() {
            Ok(addr) => info!(
                address = %addr,
                max_connections = self.config.max_connections,
                "Relay server listening"
            ),
            Err(e) => error!(error = %e, "Relay listener has no local address"),
        }

        loop {
            // Permit first: saturation pushes back on accept itself.
            let permit = tokio::select! {
                permit = limit.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
                _ = shutdown.recv() => break,
            };

            let (stream, peer) = tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok(pair) => pair,
                    Err(e) => {
                        error!(error = %e, "Accept failed");
                        continue;
                    }
                },
                _ = shutdown.recv() => break,
            };

            debug!(
                peer = %peer,
                available_permits = limit.available_permits(),
                "Connection accepted"
            );

            let store = Arc::clone(&self.store);
            let chunk_size = self.config.chunk_size;
            tokio::spawn(async move {
                let _permit = permit;
                connection::run(stream, peer, store, chunk_size).await;
            });
        }

        info!("Relay server stopped");
    }
}
