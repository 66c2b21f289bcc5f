//! HTTP front door subsystem.
//!
//! # Data Flow
//! ```text
//! Browser request
//!     → server.rs (axum Router, routes resolved at registration)
//!     → GET: static_files.rs (pages, assets, 404 page)
//!     → POST: body → RelayClient → 302 redirect to /
//! ```
//!
//! # Design Decisions
//! - Every POST redirects to `/` regardless of relay outcome; storage
//!   success is not observable through the HTTP interface
//! - POST routing ignores the path: all POSTs are treated identically
//! - Static content is a collaborator: this layer only resolves paths,
//!   infers content types, and streams bytes

pub mod server;
mod static_files;

pub use server::HttpServer;
