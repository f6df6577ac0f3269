//! SQLite-backed implementation of the MappingStore port.
//!
//! Two lookup tables: `sync_mappings` keyed by the time-entry id, and
//! `sync_state` holding the last-sync watermark as unix seconds. Plain
//! get/set/delete, no transactions.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use timebridge_core::MappingStore;
use timebridge_domain::{Result, TimebridgeError};
use tracing::debug;

use crate::errors::InfraError;

const LAST_SYNC_KEY: &str = "last_sync_time";

/// SQLite implementation of MappingStore
pub struct SqliteMappingStore {
    conn: Mutex<Connection>,
}

impl SqliteMappingStore {
    /// Open (or create) the store at the given path and ensure the schema.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(InfraError::from)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sync_mappings (
                time_entry_id INTEGER PRIMARY KEY,
                calendar_event_id TEXT NOT NULL,
                created_at INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS sync_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
        .map_err(InfraError::from)?;

        Ok(Self { conn: Mutex::new(conn) })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| TimebridgeError::Storage("mapping store mutex poisoned".into()))
    }
}

#[async_trait]
impl MappingStore for SqliteMappingStore {
    async fn event_id_for(&self, time_entry_id: i64) -> Result<Option<String>> {
        let conn = self.conn()?;
        let event_id = conn
            .query_row(
                "SELECT calendar_event_id FROM sync_mappings WHERE time_entry_id = ?1",
                params![time_entry_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(InfraError::from)?;

        if event_id.is_none() {
            debug!(time_entry_id, "no mapping for time entry");
        }
        Ok(event_id)
    }

    async fn insert_mapping(&self, time_entry_id: i64, event_id: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO sync_mappings (time_entry_id, calendar_event_id, created_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(time_entry_id) DO UPDATE SET
                calendar_event_id = excluded.calendar_event_id",
            params![time_entry_id, event_id, Utc::now().timestamp()],
        )
        .map_err(InfraError::from)?;

        debug!(time_entry_id, event_id, "stored mapping");
        Ok(())
    }

    async fn delete_mapping(&self, time_entry_id: i64) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM sync_mappings WHERE time_entry_id = ?1", params![time_entry_id])
            .map_err(InfraError::from)?;

        debug!(time_entry_id, "deleted mapping");
        Ok(())
    }

    async fn last_sync_time(&self) -> Result<Option<DateTime<Utc>>> {
        let conn = self.conn()?;
        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM sync_state WHERE key = ?1",
                params![LAST_SYNC_KEY],
                |row| row.get(0),
            )
            .optional()
            .map_err(InfraError::from)?;

        match value {
            None => Ok(None),
            Some(raw) => {
                let secs = raw.parse::<i64>().map_err(|e| {
                    TimebridgeError::Storage(format!("corrupt watermark '{raw}': {e}"))
                })?;
                Utc.timestamp_opt(secs, 0).single().map(Some).ok_or_else(|| {
                    TimebridgeError::Storage(format!("watermark out of range: {secs}"))
                })
            }
        }
    }

    async fn set_last_sync_time(&self, at: DateTime<Utc>) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO sync_state (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![LAST_SYNC_KEY, at.timestamp().to_string()],
        )
        .map_err(InfraError::from)?;

        Ok(())
    }
}
