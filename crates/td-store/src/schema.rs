//! The schema set a store is built and migrated against.
//!
//! Bundles the catalog, the delta registry, and the integrity rule set so a
//! single value can be validated once and then threaded explicitly through
//! bootstrap and migration.

use crate::catalog::{current_schema, definition_error, Catalog, IndexDef, TableDef, ViewDef};
use crate::delta::{introduced_at, pending, validate_deltas, Delta, BASELINE_VERSION, DELTAS};
use crate::error::StoreResult;
use crate::rules::{validate_rules, IntegrityRule, INTEGRITY_RULES};

/// Catalog, deltas, and rules describing one schema lineage.
#[derive(Debug, Clone, Copy)]
pub struct Schema<'a> {
    pub catalog: &'a Catalog,
    pub deltas: &'a [Delta],
    pub rules: &'a [IntegrityRule],
}

impl Schema<'static> {
    /// The schema this build writes.
    pub fn current() -> Self {
        Self {
            catalog: current_schema(),
            deltas: DELTAS,
            rules: INTEGRITY_RULES,
        }
    }
}

impl<'a> Schema<'a> {
    /// Version implied by the catalog.
    pub fn version(&self) -> u32 {
        self.catalog.version
    }

    /// Reject any internal inconsistency before a store is touched.
    pub fn validate(&self) -> StoreResult<()> {
        self.catalog.validate()?;
        validate_deltas(self.catalog, self.deltas)?;
        validate_rules(self.catalog, self.deltas, self.rules)?;

        // Indices and views are created on every historical shape and deltas
        // never add them, so they may only cover baseline columns.
        for index in self.catalog.indices {
            for column in index.columns {
                let since = introduced_at(self.deltas, index.table, column);
                if since > BASELINE_VERSION {
                    return Err(definition_error(format!(
                        "index '{}' covers '{}.{column}', added in v{since}",
                        index.name(),
                        index.table
                    )));
                }
            }
        }
        for view in self.catalog.views {
            for col in view.column_refs() {
                let since = introduced_at(self.deltas, col.table, col.column);
                if since > BASELINE_VERSION {
                    return Err(definition_error(format!(
                        "view '{}' names '{}.{}', added in v{since}",
                        view.name, col.table, col.column
                    )));
                }
            }
        }
        Ok(())
    }

    /// Deltas to apply when moving from `from` to `to`, ascending.
    pub fn pending(&self, from: u32, to: u32) -> Vec<&'a Delta> {
        pending(self.deltas, from, to)
    }

    /// Whether `version` is a shape this lineage can build.
    pub fn is_known_version(&self, version: u32) -> bool {
        (BASELINE_VERSION..=self.version()).contains(&version)
    }

    /// Column names `table` had at `version`, in declaration order.
    pub fn columns_at(&self, table: &TableDef, version: u32) -> Vec<&'static str> {
        table
            .columns
            .iter()
            .filter(|c| introduced_at(self.deltas, table.name, c.name) <= version)
            .map(|c| c.name)
            .collect()
    }

    /// `CREATE TABLE` statement for the shape `table` had at `version`.
    pub fn create_table_sql_at(&self, table: &TableDef, version: u32) -> String {
        table.create_sql_with(|c| introduced_at(self.deltas, table.name, c.name) <= version)
    }

    /// Every statement a store bootstrapped at `version` is built from:
    /// tables, indices, triggers, then views.
    pub fn ddl_at(&self, version: u32) -> Vec<String> {
        let tables = self
            .catalog
            .tables
            .iter()
            .map(|t| self.create_table_sql_at(t, version));
        let indices = self.catalog.indices.iter().map(IndexDef::create_sql);
        let triggers = self.rules.iter().map(IntegrityRule::to_sql);
        let views = self.catalog.views.iter().map(ViewDef::create_sql);
        tables.chain(indices).chain(triggers).chain(views).collect()
    }
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
