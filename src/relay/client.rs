//! Outbound relay client used by the HTTP layer.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

use crate::config::RelayConfig;
use crate::relay::RelayError;

/// Short-lived connection client: one payload, one ack, then close.
///
/// Each `send` opens a fresh connection, so the HTTP layer never holds
/// relay state between requests. The call blocks the calling task for
/// connect + write + ack-read; concurrency across HTTP requests comes
/// from the runtime, not from this client.
#[derive(Debug, Clone)]
pub struct RelayClient {
    target: String,
    ack_limit: usize,
}

impl RelayClient {
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            target: config.connect_address.clone(),
            ack_limit: config.chunk_size,
        }
    }

    /// Write one payload and wait for the echoed acknowledgment.
    ///
    /// The ack bytes are returned but callers treat them as a receipt
    /// signal only; the relay echoes before any delivery guarantee
    /// stronger than at-most-once exists.
    ///
    /// # Errors
    ///
    /// [`RelayError::Unreachable`] if the connection cannot be opened,
    /// [`RelayError::Io`] if the write or the ack read fails.
    pub async fn send(&self, payload: &[u8]) -> Result<Vec<u8>, RelayError> {
        let mut stream = TcpStream::connect(&self.target)
            .await
            .map_err(RelayError::Unreachable)?;
        debug!(endpoint = %self.target, "Relay connection established");

        stream.write_all(payload).await.map_err(RelayError::Io)?;

        let mut ack = vec![0u8; self.ack_limit];
        let n = stream.read(&mut ack).await.map_err(RelayError::Io)?;
        ack.truncate(n);

        debug!(
            endpoint = %self.target,
            payload_bytes = payload.len(),
            ack_bytes = n,
            "Relay transfer completed"
        );
        Ok(ack)
    }
}
