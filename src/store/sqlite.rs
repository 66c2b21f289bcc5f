//! SQLite-backed record sink.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Local;
use rusqlite::{params, Connection};
use tracing::debug;

use crate::codec::FieldMap;
use crate::store::{Record, RecordStore, StoreError, DATE_FIELD, DATE_FORMAT};

/// Table holding one JSON document per record.
const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    doc TEXT NOT NULL
);
";

/// SQLite store that opens a fresh session for every call.
///
/// The session-per-call discipline keeps each persistence call
/// self-contained: the connection is released on every exit path and
/// no pooling or locking is needed.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Open a session and ensure the schema exists.
    fn open(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open(&self.db_path)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        // Concurrent sessions wait on the file lock instead of
        // returning SQLITE_BUSY.
        conn.busy_timeout(std::time::Duration::from_secs(5))
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(conn)
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn insert(&self, mut fields: FieldMap) -> Result<Record, StoreError> {
        fields.insert(
            DATE_FIELD.to_string(),
            Local::now().format(DATE_FORMAT).to_string(),
        );
        let doc = serde_json::to_string(&fields)
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        let store = self.clone();
        tokio::task::spawn_blocking(move || {
            let conn = store.open()?;
            conn.execute("INSERT INTO records (doc) VALUES (?1)", params![doc])
                .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
            Ok::<_, StoreError>(())
        })
        .await
        .map_err(|e| StoreError::WriteFailed(e.to_string()))??;

        debug!(fields = fields.len(), "Record persisted");
        Ok(Record::from_fields(fields))
    }

    async fn list(&self) -> Result<Vec<Record>, StoreError> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || {
            let conn = store.open()?;
            let mut stmt = conn
                .prepare("SELECT doc FROM records ORDER BY id")
                .map_err(|e| StoreError::ReadFailed(e.to_string()))?;
            let docs = stmt
                .query_map([], |row| row.get::<_, String>(0))
                .map_err(|e| StoreError::ReadFailed(e.to_string()))?
                .collect::<Result<Vec<String>, _>>()
                .map_err(|e| StoreError::ReadFailed(e.to_string()))?;

            docs.into_iter()
                .map(|doc| {
                    serde_json::from_str::<FieldMap>(&doc)
                        .map(Record::from_fields)
                        .map_err(|e| StoreError::ReadFailed(e.to_string()))
                })
                .collect::<Result<Vec<Record>, StoreError>>()
        })
        .await
        .map_err(|e| StoreError::ReadFailed(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SqliteStore {
        SqliteStore::new(dir.path().join("records.db"))
    }

    fn fields(pairs: &[(&str, &str)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn insert_stamps_date_not_earlier_than_start() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let start = Local::now().naive_local() - chrono::Duration::seconds(1);

        let record = store
            .insert(fields(&[("name", "Alice"), ("msg", "Hi there")]))
            .await
            .unwrap();

        assert_eq!(record.get("name"), Some("Alice"));
        assert_eq!(record.get("msg"), Some("Hi there"));
        let stamped = NaiveDateTime::parse_from_str(record.date().unwrap(), DATE_FORMAT).unwrap();
        assert!(stamped >= start);
    }

    #[tokio::test]
    async fn caller_supplied_date_is_overwritten() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let record = store
            .insert(fields(&[("date", "1970-01-01"), ("name", "Bob")]))
            .await
            .unwrap();

        assert_ne!(record.date(), Some("1970-01-01"));
        NaiveDateTime::parse_from_str(record.date().unwrap(), DATE_FORMAT).unwrap();
    }

    #[tokio::test]
    async fn list_returns_records_in_insertion_order() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.insert(fields(&[("n", "1")])).await.unwrap();
        store.insert(fields(&[("n", "2")])).await.unwrap();
        store.insert(fields(&[("n", "3")])).await.unwrap();

        let records = store.list().await.unwrap();
        let values: Vec<_> = records.iter().map(|r| r.get("n").unwrap()).collect();
        assert_eq!(values, ["1", "2", "3"]);
        assert!(records.iter().all(|r| r.date().is_some()));
    }

    #[tokio::test]
    async fn unreachable_backend_is_unavailable() {
        let store = SqliteStore::new("/nonexistent-dir/formdrop/records.db");
        let err = store.insert(fields(&[("n", "1")])).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
