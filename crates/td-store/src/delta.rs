//! Versioned schema deltas.
//!
//! Each [`Delta`] adds columns and backfills them from data that already
//! existed before the delta. Entries are append-only: a new schema version is
//! a new entry with the next version number, never an edit of an old one,
//! so stores still on old versions replay exactly the same history.

use crate::catalog::tables::{instances, tasks};
use crate::catalog::{definition_error, Catalog, ColumnDef};
use crate::error::StoreResult;
use rusqlite::Connection;
use std::collections::HashSet;
use td_core::TaskStatus;

/// First schema version; it has no delta of its own.
pub const BASELINE_VERSION: u32 = 1;

/// A column added to an existing table.
#[derive(Debug, Clone, Copy)]
pub struct ColumnAddition {
    pub table: &'static str,
    pub column: ColumnDef,
}

impl ColumnAddition {
    pub fn to_sql(&self) -> String {
        format!("ALTER TABLE {} ADD COLUMN {}", self.table, self.column.to_sql())
    }
}

/// Data backfill run right after a delta's columns were added.
///
/// May only read columns that existed before the delta.
pub type Backfill = fn(&Connection) -> StoreResult<()>;

/// A single forward-only schema change.
#[derive(Debug, Clone, Copy)]
pub struct Delta {
    /// Version this delta brings the store to.
    pub version: u32,
    pub description: &'static str,
    pub columns: &'static [ColumnAddition],
    pub backfill: Backfill,
}

/// All known deltas, in order.
pub static DELTAS: &[Delta] = &[
    Delta {
        version: 2,
        description: "derive is_new and is_closed from task status",
        columns: &[
            ColumnAddition {
                table: tasks::TABLE,
                column: tasks::IS_NEW,
            },
            ColumnAddition {
                table: tasks::TABLE,
                column: tasks::IS_CLOSED,
            },
        ],
        backfill: backfill_status_flags,
    },
    Delta {
        version: 3,
        description: "add instance sorting columns",
        columns: &[
            ColumnAddition {
                table: instances::TABLE,
                column: instances::START_SORTING,
            },
            ColumnAddition {
                table: instances::TABLE,
                column: instances::DUE_SORTING,
            },
        ],
        backfill: backfill_instance_sorting,
    },
];

// A NULL status yields NULL flags; rows with a status get 0 or 1.
fn backfill_status_flags(conn: &Connection) -> StoreResult<()> {
    let needs_action = TaskStatus::NeedsAction.code();
    let in_process = TaskStatus::InProcess.code();
    conn.execute(
        &format!(
            "UPDATE {table} SET {is_new} = ({status} = ?1), {is_closed} = ({status} > ?2)",
            table = tasks::TABLE,
            is_new = tasks::IS_NEW.name,
            is_closed = tasks::IS_CLOSED.name,
            status = tasks::STATUS,
        ),
        rusqlite::params![needs_action, in_process],
    )?;
    Ok(())
}

fn backfill_instance_sorting(conn: &Connection) -> StoreResult<()> {
    conn.execute(
        &format!(
            "UPDATE {table} SET {start_sorting} = {start}, {due_sorting} = {due}",
            table = instances::TABLE,
            start_sorting = instances::START_SORTING.name,
            start = instances::START,
            due_sorting = instances::DUE_SORTING.name,
            due = instances::DUE,
        ),
        [],
    )?;
    Ok(())
}

/// Check a registry against the catalog it must converge on.
///
/// Versions start right after [`BASELINE_VERSION`], grow by exactly one, and
/// end at the catalog version. Every added column must be declared in the
/// catalog with the same definition, and may be introduced only once.
pub fn validate_deltas(catalog: &Catalog, deltas: &[Delta]) -> StoreResult<()> {
    let mut expected = BASELINE_VERSION + 1;
    let mut introduced = HashSet::new();

    for delta in deltas {
        if delta.version != expected {
            return Err(definition_error(format!(
                "delta v{} is out of sequence, expected v{expected}",
                delta.version
            )));
        }
        if delta.columns.is_empty() {
            return Err(definition_error(format!(
                "delta v{} adds no columns",
                delta.version
            )));
        }
        for addition in delta.columns {
            let Some(table) = catalog.table(addition.table) else {
                return Err(definition_error(format!(
                    "delta v{} references unknown table '{}'",
                    delta.version, addition.table
                )));
            };
            match table.column(addition.column.name) {
                Some(declared) if *declared == addition.column => {}
                Some(_) => {
                    return Err(definition_error(format!(
                        "delta v{} declares '{}.{}' differently from the catalog",
                        delta.version, addition.table, addition.column.name
                    )))
                }
                None => {
                    return Err(definition_error(format!(
                        "delta v{} adds '{}.{}' which the catalog does not declare",
                        delta.version, addition.table, addition.column.name
                    )))
                }
            }
            let column = &addition.column;
            if column.identity || (column.not_null && column.default.is_none()) {
                return Err(definition_error(format!(
                    "delta v{} cannot add '{}.{}': SQLite only adds nullable or defaulted columns",
                    delta.version, addition.table, addition.column.name
                )));
            }
            if !introduced.insert((addition.table, addition.column.name)) {
                return Err(definition_error(format!(
                    "column '{}.{}' is introduced more than once",
                    addition.table, addition.column.name
                )));
            }
        }
        expected += 1;
    }

    let last = expected - 1;
    if last != catalog.version {
        return Err(definition_error(format!(
            "deltas end at v{last} but the catalog describes v{}",
            catalog.version
        )));
    }
    Ok(())
}

/// Deltas with `from < version <= to`, ascending.
pub fn pending(deltas: &[Delta], from: u32, to: u32) -> Vec<&Delta> {
    let mut selected: Vec<&Delta> = deltas
        .iter()
        .filter(|d| d.version > from && d.version <= to)
        .collect();
    selected.sort_by_key(|d| d.version);
    selected
}

/// Version at which `table.column` first appeared.
pub fn introduced_at(deltas: &[Delta], table: &str, column: &str) -> u32 {
    deltas
        .iter()
        .find(|d| {
            d.columns
                .iter()
                .any(|c| c.table == table && c.column.name == column)
        })
        .map_or(BASELINE_VERSION, |d| d.version)
}

#[cfg(test)]
#[path = "delta_test.rs"]
mod tests;
