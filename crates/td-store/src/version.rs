//! The persisted schema version marker (`PRAGMA user_version`).
//!
//! Written inside the same transaction as the schema change it records, so a
//! rolled-back migration also rolls back the marker.

use crate::error::{StoreError, StoreResult};
use rusqlite::Connection;

/// Read the marker. A fresh database reports 0.
pub fn read_version(conn: &Connection) -> StoreResult<u32> {
    let raw: i64 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| StoreError::QueryError(format!("failed to read schema version: {e}")))?;
    u32::try_from(raw)
        .map_err(|_| StoreError::QueryError(format!("schema version {raw} is out of range")))
}

/// Record `version` as the store's schema version.
pub fn write_version(conn: &Connection, version: u32) -> StoreResult<()> {
    conn.execute_batch(&format!("PRAGMA user_version = {version}"))
        .map_err(|e| StoreError::QueryError(format!("failed to record schema version: {e}")))
}
