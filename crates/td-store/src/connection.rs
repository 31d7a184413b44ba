//! Task store connection wrapper.
//!
//! [`TaskDb`] owns a SQLite [`Connection`] and, on open, brings the store to
//! the current schema: bootstrapping a fresh file or migrating an old one.

use crate::bootstrap::bootstrap;
use crate::catalog::tables::lists;
use crate::delta::BASELINE_VERSION;
use crate::error::{StoreError, StoreResult};
use crate::migration::upgrade;
use crate::query::relation_exists;
use crate::schema::Schema;
use crate::version::read_version;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;
use td_core::{Config, SeedList};

/// How a transaction acquires the database lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionMode {
    /// Lock lazily on first read/write. Ordinary traffic.
    Deferred,
    /// Block all other connections until commit. Schema changes.
    Exclusive,
}

impl TransactionMode {
    fn begin_sql(self) -> &'static str {
        match self {
            TransactionMode::Deferred => "BEGIN DEFERRED",
            TransactionMode::Exclusive => "BEGIN EXCLUSIVE",
        }
    }
}

/// Execute `body` within a `BEGIN` / `COMMIT` transaction, rolling back on
/// error.
pub(crate) fn run_in_transaction<F, T>(
    conn: &Connection,
    mode: TransactionMode,
    body: F,
) -> StoreResult<T>
where
    F: FnOnce(&Connection) -> StoreResult<T>,
{
    conn.execute_batch(mode.begin_sql())
        .map_err(|e| StoreError::TransactionError(format!("BEGIN failed: {e}")))?;

    let result = body(conn);

    match &result {
        Ok(_) => {
            if let Err(commit_err) = conn.execute_batch("COMMIT") {
                let _ = conn.execute_batch("ROLLBACK");
                return Err(StoreError::TransactionError(format!(
                    "COMMIT failed: {commit_err}"
                )));
            }
        }
        Err(e) => {
            log::debug!("Rolling back transaction: {e}");
            let _ = conn.execute_batch("ROLLBACK");
        }
    }
    result
}

/// What opening a store had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// No prior version existed; the current schema was created.
    Bootstrapped,
    /// The store was migrated from an older version.
    Upgraded { from: u32 },
    /// Already at the current version.
    UpToDate,
}

/// Wrapper around the single writer connection of a task store.
///
/// Single-threaded: the caller holding a `TaskDb` is the only writer, which
/// is what keeps open-time migration from interleaving with other traffic.
pub struct TaskDb {
    conn: Connection,
    outcome: OpenOutcome,
}

impl TaskDb {
    /// Open (or create) the store at `path` and bring it to the current schema.
    pub fn open(path: &Path, config: &Config) -> StoreResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| StoreError::ConnectionError(format!("{e}: {}", path.display())))?;
        Self::from_connection(conn, &Schema::current(), config)
    }

    /// Create an in-memory store with the current schema.
    ///
    /// Useful for unit tests that don't need persistence.
    pub fn open_memory(config: &Config) -> StoreResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::ConnectionError(e.to_string()))?;
        Self::from_connection(conn, &Schema::current(), config)
    }

    /// Adopt an already-open connection and prepare it against `schema`.
    pub fn from_connection(
        conn: Connection,
        schema: &Schema<'_>,
        config: &Config,
    ) -> StoreResult<Self> {
        conn.busy_timeout(Duration::from_millis(config.database.busy_timeout_ms))
            .map_err(|e| StoreError::ConnectionError(format!("busy_timeout: {e}")))?;
        let outcome = prepare(&conn, schema, &config.seed)?;
        Ok(Self { conn, outcome })
    }

    /// Borrow the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// What opening this store did.
    pub fn open_outcome(&self) -> OpenOutcome {
        self.outcome
    }

    /// The persisted schema version.
    pub fn version(&self) -> StoreResult<u32> {
        read_version(&self.conn)
    }

    /// Execute `body` within a transaction, rolling back on error.
    ///
    /// Integrity triggers fire inside this transaction and roll back with it.
    pub fn transaction<F, T>(&self, body: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T>,
    {
        run_in_transaction(&self.conn, TransactionMode::Deferred, body)
    }

    /// Close the connection, surfacing any error SQLite reports.
    pub fn close(self) -> StoreResult<()> {
        self.conn
            .close()
            .map_err(|(_, e)| StoreError::ConnectionError(format!("close failed: {e}")))
    }
}

/// Read the marker once and bootstrap or upgrade as needed.
///
/// A marker of 0 with the lists table present is a store written before the
/// marker existed; it is migrated from 0 like any other old store.
fn prepare(conn: &Connection, schema: &Schema<'_>, seed: &SeedList) -> StoreResult<OpenOutcome> {
    schema.validate()?;
    let stored = read_version(conn)?;
    let target = schema.version();

    if stored == 0 {
        if !relation_exists(conn, lists::TABLE)? {
            bootstrap(conn, schema, seed)?;
            return Ok(OpenOutcome::Bootstrapped);
        }
        log::warn!(
            "Task store has tables but no schema version; assuming the v{BASELINE_VERSION} layout"
        );
    }

    if stored > target {
        return Err(StoreError::NewerSchema {
            found: stored,
            supported: target,
        });
    }
    if stored == target {
        log::debug!("Task store is at schema v{stored}");
        return Ok(OpenOutcome::UpToDate);
    }

    upgrade(conn, schema, stored, target)?;
    Ok(OpenOutcome::Upgraded { from: stored })
}

#[cfg(test)]
#[path = "connection_test.rs"]
mod tests;
