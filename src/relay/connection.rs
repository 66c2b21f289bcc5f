//! Per-connection receive loop.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, error, info};

use crate::codec;
use crate::observability::metrics;
use crate::store::RecordStore;

/// Global atomic counter for connection IDs. Relaxed ordering is
/// sufficient since only uniqueness matters.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for an accepted relay connection, used in log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ConnectionId(u64);

impl ConnectionId {
    pub(crate) fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Run the receive loop for one accepted connection until EOF or a
/// socket error.
///
/// Each iteration performs one bounded read, one decode + persist
/// attempt, and one echo write. The echo is sent after the persistence
/// attempt completes, whatever its outcome, so a peer that waits for
/// the ack of payload N observes payload N's persistence attempt done.
pub(crate) async fn run(
    mut stream: TcpStream,
    peer: SocketAddr,
    store: Arc<dyn RecordStore>,
    chunk_size: usize,
) {
    let id = ConnectionId::new();
    info!(connection_id = %id, peer = %peer, "Connection established");

    let mut buf = vec![0u8; chunk_size];
    loop {
        let n = match stream.read(&mut buf).await {
            Ok(0) => {
                info!(connection_id = %id, peer = %peer, "Connection closed by peer");
                return;
            }
            Ok(n) => n,
            Err(e) => {
                error!(connection_id = %id, peer = %peer, error = %e, "Read failed");
                return;
            }
        };

        let payload = &buf[..n];
        metrics::record_submission();
        debug!(connection_id = %id, bytes = n, "Payload received");

        match codec::decode(payload) {
            Ok(fields) => match store.insert(fields).await {
                Ok(record) => {
                    metrics::record_persisted();
                    debug!(
                        connection_id = %id,
                        fields = record.fields().len(),
                        date = record.date().unwrap_or(""),
                        "Record persisted"
                    );
                }
                Err(e) => {
                    // Record is lost: no retry, no dead-letter queue.
                    metrics::record_store_error();
                    error!(connection_id = %id, error = %e, "Record not persisted");
                }
            },
            Err(e) => {
                metrics::record_decode_error();
                error!(connection_id = %id, error = %e, "Payload discarded");
            }
        }

        if let Err(e) = stream.write_all(payload).await {
            error!(connection_id = %id, peer = %peer, error = %e, "Ack write failed");
            return;
        }
    }
}
