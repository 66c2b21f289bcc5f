//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use formdrop::config::RelayConfig;
use formdrop::lifecycle::Shutdown;
use formdrop::relay::RelayServer;
use formdrop::store::{RecordStore, SqliteStore};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Start a relay server on an ephemeral port backed by a fresh SQLite
/// database inside `dir`.
///
/// The returned [`Shutdown`] must be kept alive for the server's
/// lifetime; dropping it stops the accept loop.
pub async fn start_relay(dir: &TempDir) -> (SocketAddr, SqliteStore, Shutdown) {
    let store = SqliteStore::new(dir.path().join("records.db"));
    let handle = start_relay_with_store(Arc::new(store.clone())).await;
    (handle.addr, store, handle.shutdown)
}

/// Start a relay server over an arbitrary store implementation.
#[allow(dead_code)]
pub async fn start_relay_with_store(store: Arc<dyn RecordStore>) -> RelayHandle {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let config = RelayConfig {
        bind_address: addr.to_string(),
        connect_address: addr.to_string(),
        ..RelayConfig::default()
    };
    let shutdown = Shutdown::new();
    let server = RelayServer::new(config, store);
    let rx = shutdown.subscribe();
    tokio::spawn(server.run(listener, rx));
    RelayHandle { addr, shutdown }
}

/// Address and shutdown guard of a running relay server.
pub struct RelayHandle {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}
