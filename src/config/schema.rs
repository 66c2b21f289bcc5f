//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files,
//! and every field carries a default so a minimal (or absent) config
//! still yields a runnable setup.

use serde::{Deserialize, Serialize};

/// Root configuration for the submission pipeline.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP front door configuration.
    pub http: HttpConfig,

    /// Relay listener and client configuration.
    pub relay: RelayConfig,

    /// Storage backend configuration.
    pub storage: StorageConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP front door configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Directory the static site is served from.
    pub static_root: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            static_root: "static".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Relay configuration, shared by the listener and the client side.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Address the relay server binds to.
    pub bind_address: String,

    /// Address the HTTP layer connects to. May be a hostname.
    pub connect_address: String,

    /// Maximum concurrent relay connections (backpressure).
    pub max_connections: usize,

    /// Bounded read size per payload; also the client's ack read limit.
    pub chunk_size: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5000".to_string(),
            connect_address: "127.0.0.1:5000".to_string(),
            max_connections: 10,
            chunk_size: 1024,
        }
    }
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    pub db_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: "formdrop.db".to_string(),
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus exposition endpoint.
    pub metrics_enabled: bool,

    /// Address the metrics endpoint binds to.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9100".to_string(),
        }
    }
}
