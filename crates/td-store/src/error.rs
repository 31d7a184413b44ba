//! Error types for the task store engine.

use thiserror::Error;

/// Task store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open or configure the SQLite database (S001).
    #[error("[S001] Task store connection failed: {0}")]
    ConnectionError(String),

    /// Catalog, delta registry, or rule set is internally inconsistent (S002).
    #[error("[S002] Schema definition is inconsistent: {0}")]
    SchemaDefinitionError(String),

    /// A structural change or backfill failed mid-upgrade (S003).
    #[error("[S003] Migration to v{version} failed: {message}")]
    MigrationFailed { version: u32, message: String },

    /// A trigger or view could not be (re)installed (S004).
    #[error("[S004] Integrity rule install failed: {0}")]
    IntegrityRuleInstallError(String),

    /// Caller misuse: bad version arguments or an already-initialized store (S005).
    #[error("[S005] Precondition violated: {0}")]
    Precondition(String),

    /// The store was written by a newer schema than this build knows (S006).
    #[error("[S006] Task store is at schema v{found}, newest supported is v{supported}")]
    NewerSchema { found: u32, supported: u32 },

    /// Creating a fresh store failed (S007).
    #[error("[S007] Bootstrap failed: {0}")]
    BootstrapFailed(String),

    /// SQL execution error outside migration and bootstrap (S008).
    #[error("[S008] Task store query failed: {0}")]
    QueryError(String),

    /// Transaction management error (S009).
    #[error("[S009] Task store transaction failed: {0}")]
    TransactionError(String),

    /// SQLite driver error with preserved source chain (S010).
    #[error("[S010] SQLite error")]
    Sqlite(#[source] rusqlite::Error),
}

/// Result type alias for [`StoreError`].
pub type StoreResult<T> = Result<T, StoreError>;

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Sqlite(err)
    }
}
