//! Record persistence subsystem.
//!
//! # Data Flow
//! ```text
//! FieldMap (decoded submission)
//!     → RecordStore::insert (stamp `date`, one document per call)
//!     → storage backend (SQLite, one JSON document per row)
//!
//! Read path (operators and tests only):
//!     RecordStore::list → all records in insertion order
//! ```
//!
//! # Design Decisions
//! - The store is an append-only sink; the pipeline never reads back
//! - No internal retry: the caller decides to log-and-continue
//! - Each call acquires its own backend session and releases it on
//!   every exit path

mod sqlite;

pub use sqlite::SqliteStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::codec::FieldMap;

/// Field name injected at persistence time. A caller-supplied field
/// with this name is overwritten by the server timestamp.
pub const DATE_FIELD: &str = "date";

/// Timestamp format of the injected `date` field.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached or opened.
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    /// The insert itself failed; the record is lost.
    #[error("storage write failed: {0}")]
    WriteFailed(String),

    /// Reading persisted records back failed.
    #[error("storage read failed: {0}")]
    ReadFailed(String),
}

/// One persisted, timestamped submission.
#[derive(Debug, Clone)]
pub struct Record {
    fields: FieldMap,
}

impl Record {
    pub(crate) fn from_fields(fields: FieldMap) -> Self {
        Self { fields }
    }

    /// All fields, including the injected `date`.
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key)
    }

    /// The server-assigned timestamp, formatted per [`DATE_FORMAT`].
    pub fn date(&self) -> Option<&str> {
        self.fields.get(DATE_FIELD)
    }
}

/// Append-only sink for decoded submissions.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Stamp the fields with a `date` timestamp and durably insert
    /// exactly one record. Must not retry internally.
    async fn insert(&self, fields: FieldMap) -> Result<Record, StoreError>;

    /// All persisted records in insertion order.
    async fn list(&self) -> Result<Vec<Record>, StoreError>;
}
