//! Task store schema engine.
//!
//! Describes the current SQLite schema of the task store (lists, tasks,
//! instances, properties, categories), evolves persisted stores forward
//! through an append-only registry of versioned deltas, and maintains
//! cross-table invariants (cascade deletes, dirty counters) with triggers
//! generated from declarative integrity rules.

pub mod bootstrap;
pub mod catalog;
pub mod connection;
pub mod delta;
pub mod derived;
pub mod error;
pub mod migration;
pub mod query;
pub(crate) mod row_helpers;
pub mod rules;
pub mod schema;
pub mod version;

pub use bootstrap::{bootstrap, bootstrap_at_version};
pub use catalog::{current_schema, Catalog, CURRENT_VERSION};
pub use connection::{OpenOutcome, TaskDb};
pub use delta::{Delta, BASELINE_VERSION, DELTAS};
pub use error::{StoreError, StoreResult};
pub use migration::upgrade;
pub use rules::{IntegrityRule, INTEGRITY_RULES};
pub use schema::Schema;
