//! Relay transport subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP POST body
//!     → client.rs (one connection per payload: connect, write, read ack)
//!     → TCP, unframed: one write on the sender side pairs with one
//!       bounded read on the server side
//!     → server.rs (semaphore-bounded accept loop)
//!     → connection.rs (read → decode → persist → echo, until EOF)
//! ```
//!
//! # Design Decisions
//! - No length prefix or framing; the echo of the received bytes is the
//!   acknowledgment and signals receipt, not persistence success
//! - The ack for a chunk is written only after that chunk's persistence
//!   attempt has finished, so per-connection ordering is preserved
//! - Decode and store failures are logged and the connection continues;
//!   only socket errors tear a connection down

pub mod client;
mod connection;
pub mod server;

pub use client::RelayClient;
pub use server::RelayServer;

use thiserror::Error;

/// Error type for relay client operations.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Connecting to the relay endpoint failed.
    #[error("relay endpoint unreachable: {0}")]
    Unreachable(#[source] std::io::Error),

    /// Writing the payload or reading the ack failed.
    #[error("relay I/O failed: {0}")]
    Io(#[source] std::io::Error),
}
