//! Ad-hoc query execution and schema introspection helpers.
//!
//! Returns plain Rust types so callers don't need a direct `rusqlite` dependency.

use crate::error::{StoreError, StoreResult};
use crate::row_helpers::get_column_as_string;
use rusqlite::Connection;
use serde::Serialize;

/// Result of executing an ad-hoc SQL query against the store.
#[derive(Debug, Serialize)]
pub struct QueryResult {
    /// Column names from the result set.
    pub columns: Vec<String>,
    /// Rows of string-coerced values.
    pub rows: Vec<Vec<String>>,
}

/// Execute an ad-hoc SQL query and return all results as strings.
pub fn execute_query(conn: &Connection, sql: &str) -> StoreResult<QueryResult> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| StoreError::QueryError(format!("prepare failed: {e}")))?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let column_count = columns.len();

    let rows = stmt
        .query_map([], |row| {
            Ok((0..column_count)
                .map(|i| get_column_as_string(row, i))
                .collect::<Vec<_>>())
        })
        .map_err(|e| StoreError::QueryError(format!("query failed: {e}")))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| StoreError::QueryError(format!("row error: {e}")))?;

    Ok(QueryResult { columns, rows })
}

/// Kind of schema object recorded in `sqlite_master`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Table,
    Index,
    View,
    Trigger,
}

impl ObjectKind {
    fn as_sql(self) -> &'static str {
        match self {
            ObjectKind::Table => "table",
            ObjectKind::Index => "index",
            ObjectKind::View => "view",
            ObjectKind::Trigger => "trigger",
        }
    }
}

/// Names of all user objects of `kind`, sorted. SQLite internals are skipped.
pub fn list_objects(conn: &Connection, kind: ObjectKind) -> StoreResult<Vec<String>> {
    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = ?1 AND name NOT LIKE 'sqlite_%' \
             ORDER BY name",
        )
        .map_err(|e| StoreError::QueryError(format!("prepare failed: {e}")))?;
    let names = stmt
        .query_map([kind.as_sql()], |row| row.get::<_, String>(0))
        .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
        .map_err(|e| StoreError::QueryError(format!("list {}s failed: {e}", kind.as_sql())))?;
    Ok(names)
}

/// Whether a table or view named `name` exists.
pub fn relation_exists(conn: &Connection, name: &str) -> StoreResult<bool> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type IN ('table', 'view') AND name = ?1",
            [name],
            |row| row.get(0),
        )
        .map_err(|e| StoreError::QueryError(format!("relation lookup failed: {e}")))?;
    Ok(count > 0)
}

/// A column as reported by `PRAGMA table_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub declared_type: String,
    pub not_null: bool,
    pub default: Option<String>,
    pub primary_key: bool,
}

/// Columns of `table` in storage order.
pub fn table_columns(conn: &Connection, table: &str) -> StoreResult<Vec<ColumnInfo>> {
    ensure_identifier(table)?;
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .map_err(|e| StoreError::QueryError(format!("prepare failed: {e}")))?;
    let columns = stmt
        .query_map([], |row| {
            Ok(ColumnInfo {
                name: row.get(1)?,
                declared_type: row.get(2)?,
                not_null: row.get::<_, i64>(3)? != 0,
                default: row.get(4)?,
                primary_key: row.get::<_, i64>(5)? != 0,
            })
        })
        .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
        .map_err(|e| StoreError::QueryError(format!("table_info({table}) failed: {e}")))?;
    Ok(columns)
}

/// Get the row count for a table or view.
pub fn table_row_count(conn: &Connection, table_name: &str) -> StoreResult<i64> {
    ensure_identifier(table_name)?;
    let count: i64 = conn
        .query_row(&format!("SELECT COUNT(*) FROM {table_name}"), [], |row| {
            row.get(0)
        })
        .map_err(|e| StoreError::QueryError(format!("count failed for {table_name}: {e}")))?;
    Ok(count)
}

/// Row count of one table in a [`StoreSummary`].
#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    pub name: String,
    pub rows: i64,
}

/// Snapshot of a store's version and schema objects.
#[derive(Debug, Clone, Serialize)]
pub struct StoreSummary {
    pub version: u32,
    pub tables: Vec<TableSummary>,
    pub indices: Vec<String>,
    pub views: Vec<String>,
    pub triggers: Vec<String>,
}

/// Collect a [`StoreSummary`].
pub fn summarize(conn: &Connection) -> StoreResult<StoreSummary> {
    let tables = list_objects(conn, ObjectKind::Table)?
        .into_iter()
        .map(|name| {
            let rows = table_row_count(conn, &name)?;
            Ok(TableSummary { name, rows })
        })
        .collect::<StoreResult<Vec<_>>>()?;

    Ok(StoreSummary {
        version: crate::version::read_version(conn)?,
        tables,
        indices: list_objects(conn, ObjectKind::Index)?,
        views: list_objects(conn, ObjectKind::View)?,
        triggers: list_objects(conn, ObjectKind::Trigger)?,
    })
}

fn ensure_identifier(name: &str) -> StoreResult<()> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(StoreError::QueryError(format!(
            "invalid table name '{name}': must contain only alphanumeric characters and underscores"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
