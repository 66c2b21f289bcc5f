//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main):
//!     logging → config → metrics → store → relay listener → http listener
//!
//! Shutdown:
//!     ctrl-c → Shutdown::trigger → both accept loops stop →
//!     in-flight connections drain best-effort
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error (bind, config) is fatal
//! - After startup, failures are contained and logged; nothing crashes
//!   the process
//! - No drain protocol: shutdown abandons stalled connections

pub mod shutdown;

pub use shutdown::Shutdown;
