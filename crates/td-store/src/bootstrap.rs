//! Building a fresh store.
//!
//! Only runs when no version marker exists. Everything (tables, indices,
//! triggers, views, the seed list, and the marker) is written in one
//! exclusive transaction.

use crate::catalog::tables::lists;
use crate::connection::{run_in_transaction, TransactionMode};
use crate::derived::install_derived_objects;
use crate::error::{StoreError, StoreResult};
use crate::query::relation_exists;
use crate::schema::Schema;
use crate::version::{read_version, write_version};
use rusqlite::Connection;
use td_core::SeedList;

/// Create the current schema and the seed list.
pub fn bootstrap(conn: &Connection, schema: &Schema<'_>, seed: &SeedList) -> StoreResult<()> {
    bootstrap_at_version(conn, schema, schema.version(), seed)
}

/// Create the schema as it looked at `version`, plus the seed list.
///
/// Older shapes omit the columns later deltas add; rules, views, and indices
/// are the same at every version. Produces stores that later migrate exactly
/// like ones written by older releases.
pub fn bootstrap_at_version(
    conn: &Connection,
    schema: &Schema<'_>,
    version: u32,
    seed: &SeedList,
) -> StoreResult<()> {
    if !schema.is_known_version(version) {
        return Err(StoreError::Precondition(format!(
            "cannot bootstrap unknown schema v{version}"
        )));
    }
    schema.validate()?;
    log::info!("Bootstrapping task store at schema v{version}");

    run_in_transaction(conn, TransactionMode::Exclusive, |conn| {
        let existing = read_version(conn)?;
        if existing != 0 || relation_exists(conn, lists::TABLE)? {
            return Err(StoreError::Precondition(format!(
                "store is already initialized (schema v{existing})"
            )));
        }

        for table in schema.catalog.tables {
            log::debug!("Creating table {}", table.name);
            conn.execute_batch(&schema.create_table_sql_at(table, version))
                .map_err(|e| StoreError::BootstrapFailed(format!("table {}: {e}", table.name)))?;
        }
        for index in schema.catalog.indices {
            conn.execute_batch(&index.create_sql())
                .map_err(|e| StoreError::BootstrapFailed(format!("index {}: {e}", index.name())))?;
        }
        install_derived_objects(conn, schema)?;
        insert_seed_list(conn, seed)?;
        write_version(conn, version)
    })
}

fn insert_seed_list(conn: &Connection, seed: &SeedList) -> StoreResult<()> {
    conn.execute(
        &format!(
            "INSERT INTO {} ({}, {}, {}, {}, {}, {}, {}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            lists::TABLE,
            lists::ACCOUNT_TYPE,
            lists::ACCOUNT_NAME,
            lists::LIST_NAME,
            lists::LIST_COLOR,
            lists::VISIBLE,
            lists::SYNC_ENABLED,
            lists::OWNER,
        ),
        rusqlite::params![
            seed.account_type,
            seed.account_name,
            seed.list_name,
            seed.list_color.to_stored(),
            1,
            1,
            seed.owner,
        ],
    )
    .map_err(|e| StoreError::BootstrapFailed(format!("insert seed list: {e}")))?;
    Ok(())
}

#[cfg(test)]
#[path = "bootstrap_test.rs"]
mod tests;
