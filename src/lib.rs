//! formdrop: two-hop form submission pipeline.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌───────────────────────────────────────────────┐
//!                    │                  FORMDROP                     │
//!                    │                                               │
//!   Browser GET ─────┼─▶ http (axum router, static site)             │
//!                    │                                               │
//!   Browser POST ────┼─▶ http ──▶ relay::client ──┐                  │
//!                    │        302 ◀── ack ◀──┐    │ TCP (unframed,   │
//!                    │                       │    │  echo = ack)     │
//!                    │                       │    ▼                  │
//!                    │              relay::server (bounded accepts)  │
//!                    │                       │                       │
//!                    │                 codec::decode                 │
//!                    │                       │                       │
//!                    │              store (stamp date, insert        │
//!                    │                     one JSON document)        │
//!                    │                                               │
//!                    │  Cross-cutting: config, observability,        │
//!                    │                 lifecycle                     │
//!                    └───────────────────────────────────────────────┘
//! ```
//!
//! The HTTP front door and the relay server run as independent tasks
//! sharing only startup configuration; the TCP socket between them is
//! the only coupling.

// Core subsystems
pub mod codec;
pub mod config;
pub mod http;
pub mod relay;
pub mod store;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use relay::{RelayClient, RelayServer};
pub use store::{RecordStore, SqliteStore};
