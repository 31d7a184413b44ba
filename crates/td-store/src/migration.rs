//! Migration engine: moves a store from its persisted version to the
//! version the catalog describes.
//!
//! The whole upgrade is one exclusive transaction. Existing triggers and
//! views are dropped first (so backfills never fire integrity rules), the
//! pending deltas run in ascending order, then the rule set and views are
//! reinstalled against the new table shapes and the marker is written.
//! Any failure rolls everything back, marker included.

use crate::connection::{run_in_transaction, TransactionMode};
use crate::delta::Delta;
use crate::derived::{drop_derived_objects, install_derived_objects};
use crate::error::{StoreError, StoreResult};
use crate::schema::Schema;
use crate::version::{read_version, write_version};
use rusqlite::Connection;

/// Upgrade a store from `from` to `to`.
///
/// `to` must be the schema's version and the persisted marker must equal
/// `from`; otherwise nothing is touched and [`StoreError::Precondition`] is
/// returned.
pub fn upgrade(conn: &Connection, schema: &Schema<'_>, from: u32, to: u32) -> StoreResult<()> {
    if from >= to {
        return Err(StoreError::Precondition(format!(
            "cannot upgrade from v{from} to v{to}"
        )));
    }
    if to != schema.version() {
        return Err(StoreError::Precondition(format!(
            "upgrade target v{to} does not match schema v{}",
            schema.version()
        )));
    }
    schema.validate()?;

    let deltas = schema.pending(from, to);
    log::info!(
        "Upgrading task store from v{from} to v{to} ({} deltas)",
        deltas.len()
    );

    run_in_transaction(conn, TransactionMode::Exclusive, |conn| {
        let stored = read_version(conn)?;
        if stored != from {
            return Err(StoreError::Precondition(format!(
                "store is at v{stored}, upgrade expected v{from}"
            )));
        }

        drop_derived_objects(conn)?;
        for delta in &deltas {
            apply_delta(conn, delta)?;
        }
        install_derived_objects(conn, schema)?;
        write_version(conn, to).map_err(|e| StoreError::MigrationFailed {
            version: to,
            message: e.to_string(),
        })
    })
}

fn apply_delta(conn: &Connection, delta: &Delta) -> StoreResult<()> {
    log::debug!("Applying delta v{}: {}", delta.version, delta.description);
    let failed = |message: String| StoreError::MigrationFailed {
        version: delta.version,
        message,
    };

    for addition in delta.columns {
        conn.execute_batch(&addition.to_sql()).map_err(|e| {
            failed(format!(
                "add column {}.{}: {e}",
                addition.table, addition.column.name
            ))
        })?;
    }
    (delta.backfill)(conn).map_err(|e| failed(format!("backfill: {e}")))
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
