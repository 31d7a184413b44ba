//! Declarative description of the current task store schema.
//!
//! The catalog lists every table, index, and derived view of the newest
//! schema version and renders them to SQLite DDL. It never touches a
//! connection; [`crate::bootstrap`] and [`crate::migration`] consume it.

pub mod tables;

use crate::error::{StoreError, StoreResult};
use std::collections::HashSet;

/// Schema version described by [`current_schema`].
pub const CURRENT_VERSION: u32 = 3;

/// Declared storage class of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Text,
    Real,
}

impl ColumnType {
    /// SQL type keyword.
    pub const fn as_sql(self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Text => "TEXT",
            ColumnType::Real => "REAL",
        }
    }
}

/// A single column: name, type, and constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ty: ColumnType,
    /// Literal default expression, e.g. `"0"`.
    pub default: Option<&'static str>,
    pub not_null: bool,
    /// `INTEGER PRIMARY KEY AUTOINCREMENT` identity column.
    pub identity: bool,
}

impl ColumnDef {
    const fn new(name: &'static str, ty: ColumnType) -> Self {
        Self {
            name,
            ty,
            default: None,
            not_null: false,
            identity: false,
        }
    }

    pub const fn integer(name: &'static str) -> Self {
        Self::new(name, ColumnType::Integer)
    }

    pub const fn text(name: &'static str) -> Self {
        Self::new(name, ColumnType::Text)
    }

    /// Autoincrementing integer row identity.
    pub const fn identity(name: &'static str) -> Self {
        let mut col = Self::integer(name);
        col.identity = true;
        col
    }

    pub const fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub const fn default_value(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    /// Column clause as used in `CREATE TABLE` and `ALTER TABLE ... ADD COLUMN`.
    pub fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.ty.as_sql());
        if self.identity {
            sql.push_str(" PRIMARY KEY AUTOINCREMENT");
        }
        if self.not_null {
            sql.push_str(" NOT NULL");
        }
        if let Some(default) = self.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(default);
        }
        sql
    }
}

/// A table and its columns in declaration order.
#[derive(Debug, Clone, Copy)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
}

impl TableDef {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// `CREATE TABLE` statement with every column.
    pub fn create_sql(&self) -> String {
        self.create_sql_with(|_| true)
    }

    /// `CREATE TABLE` statement limited to the columns `keep` accepts.
    ///
    /// Used to rebuild the shape a table had at an older schema version.
    pub fn create_sql_with(&self, keep: impl Fn(&ColumnDef) -> bool) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .filter(|c| keep(c))
            .map(ColumnDef::to_sql)
            .collect();
        format!("CREATE TABLE {} ({})", self.name, columns.join(", "))
    }
}

/// A (possibly covering) index. The first column drives lookups.
#[derive(Debug, Clone, Copy)]
pub struct IndexDef {
    pub table: &'static str,
    pub columns: &'static [&'static str],
}

impl IndexDef {
    /// Index name: `<table>_<firstIndexedColumn>_idx`.
    pub fn name(&self) -> String {
        let first = self.columns.first().copied().unwrap_or_default();
        format!("{}_{}_idx", self.table, first)
    }

    pub fn create_sql(&self) -> String {
        format!(
            "CREATE INDEX {} ON {} ({})",
            self.name(),
            self.table,
            self.columns.join(", ")
        )
    }
}

/// `table.column` reference used by view joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRef {
    pub table: &'static str,
    pub column: &'static str,
}

impl ColumnRef {
    pub const fn new(table: &'static str, column: &'static str) -> Self {
        Self { table, column }
    }

    fn to_sql(self) -> String {
        format!("{}.{}", self.table, self.column)
    }
}

/// One projected item of a view.
#[derive(Debug, Clone, Copy)]
pub enum ViewColumn {
    /// `table.*`
    AllOf(&'static str),
    /// A single denormalized parent column.
    Column(ColumnRef),
}

/// Inner join of `table` on `left = right`.
#[derive(Debug, Clone, Copy)]
pub struct ViewJoin {
    pub table: &'static str,
    pub left: ColumnRef,
    pub right: ColumnRef,
}

/// A derived read projection: a pure join, never filtered.
#[derive(Debug, Clone, Copy)]
pub struct ViewDef {
    pub name: &'static str,
    pub from: &'static str,
    pub joins: &'static [ViewJoin],
    pub columns: &'static [ViewColumn],
}

impl ViewDef {
    pub fn create_sql(&self) -> String {
        let projection: Vec<String> = self
            .columns
            .iter()
            .map(|c| match c {
                ViewColumn::AllOf(table) => format!("{table}.*"),
                ViewColumn::Column(col) => col.to_sql(),
            })
            .collect();
        let mut sql = format!(
            "CREATE VIEW {} AS SELECT {} FROM {}",
            self.name,
            projection.join(", "),
            self.from
        );
        for join in self.joins {
            sql.push_str(&format!(
                " JOIN {} ON ({} = {})",
                join.table,
                join.left.to_sql(),
                join.right.to_sql()
            ));
        }
        sql
    }

    /// Tables this view reads from.
    fn sources(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.from).chain(self.joins.iter().map(|j| j.table))
    }

    /// Every explicitly named column reference (projection and join keys).
    pub fn column_refs(&self) -> impl Iterator<Item = ColumnRef> + '_ {
        let projected = self.columns.iter().filter_map(|c| match c {
            ViewColumn::Column(col) => Some(*col),
            ViewColumn::AllOf(_) => None,
        });
        let joined = self.joins.iter().flat_map(|j| [j.left, j.right]);
        projected.chain(joined)
    }
}

/// The full schema at one version.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    pub version: u32,
    /// Tables in dependency order: owners before the tables referencing them.
    pub tables: &'static [TableDef],
    pub indices: &'static [IndexDef],
    pub views: &'static [ViewDef],
}

static CURRENT: Catalog = Catalog {
    version: CURRENT_VERSION,
    tables: tables::TABLES,
    indices: tables::INDICES,
    views: tables::VIEWS,
};

/// The catalog of the newest schema version.
pub fn current_schema() -> &'static Catalog {
    &CURRENT
}

impl Catalog {
    pub fn table(&self, name: &str) -> Option<&TableDef> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Whether `table.column` is declared.
    pub fn has_column(&self, table: &str, column: &str) -> bool {
        self.table(table)
            .is_some_and(|t| t.column(column).is_some())
    }

    /// Check that every name the catalog refers to is declared.
    pub fn validate(&self) -> StoreResult<()> {
        let mut names = HashSet::new();
        for table in self.tables {
            if !names.insert(table.name) {
                return Err(definition_error(format!("duplicate table '{}'", table.name)));
            }
            if table.columns.is_empty() {
                return Err(definition_error(format!("table '{}' has no columns", table.name)));
            }
            let mut columns = HashSet::new();
            for col in table.columns {
                if !columns.insert(col.name) {
                    return Err(definition_error(format!(
                        "duplicate column '{}.{}'",
                        table.name, col.name
                    )));
                }
            }
            if table.columns.iter().filter(|c| c.identity).count() != 1 {
                return Err(definition_error(format!(
                    "table '{}' must declare exactly one identity column",
                    table.name
                )));
            }
        }

        let mut index_names = HashSet::new();
        for index in self.indices {
            if index.columns.is_empty() {
                return Err(definition_error(format!(
                    "index on '{}' has no columns",
                    index.table
                )));
            }
            if self.table(index.table).is_none() {
                return Err(definition_error(format!(
                    "index '{}' targets unknown table '{}'",
                    index.name(),
                    index.table
                )));
            }
            for col in index.columns {
                if !self.has_column(index.table, col) {
                    return Err(definition_error(format!(
                        "index '{}' covers unknown column '{}.{col}'",
                        index.name(),
                        index.table
                    )));
                }
            }
            if names.contains(index.name().as_str()) || !index_names.insert(index.name()) {
                return Err(definition_error(format!(
                    "index '{}' collides with another relation",
                    index.name()
                )));
            }
        }

        for view in self.views {
            if index_names.contains(view.name) || !names.insert(view.name) {
                return Err(definition_error(format!(
                    "view '{}' collides with another relation",
                    view.name
                )));
            }
            for source in view.sources() {
                if self.table(source).is_none() {
                    return Err(definition_error(format!(
                        "view '{}' joins unknown table '{source}'",
                        view.name
                    )));
                }
            }
            for col in view.columns {
                if let ViewColumn::AllOf(table) = col {
                    if !view.sources().any(|s| s == *table) {
                        return Err(definition_error(format!(
                            "view '{}' projects '{table}.*' without joining it",
                            view.name
                        )));
                    }
                }
            }
            for col in view.column_refs() {
                if !view.sources().any(|s| s == col.table)
                    || !self.has_column(col.table, col.column)
                {
                    return Err(definition_error(format!(
                        "view '{}' references unknown column '{}'",
                        view.name,
                        col.to_sql()
                    )));
                }
            }
        }
        Ok(())
    }
}

pub(crate) fn definition_error(message: String) -> StoreError {
    StoreError::SchemaDefinitionError(message)
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
