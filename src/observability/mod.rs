//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, Prometheus exposition)
//! ```
//!
//! # Design Decisions
//! - Structured logging via tracing; filter overridable with RUST_LOG
//! - Counters are cheap atomic increments; exposition is optional and
//!   off by default

pub mod logging;
pub mod metrics;
