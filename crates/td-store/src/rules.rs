//! Integrity rules: cascade deletes and dirty-counter propagation.
//!
//! SQLite is not asked to enforce foreign keys. Instead every cross-table
//! invariant is a declarative [`IntegrityRule`] (event → effects) that is
//! rendered into a row-level `AFTER` trigger when a store is bootstrapped or
//! migrated. The rule definitions themselves carry no SQLite syntax.

use crate::catalog::tables::{instances, lists, properties, tasks};
use crate::catalog::{definition_error, Catalog};
use crate::delta::{introduced_at, Delta, BASELINE_VERSION};
use crate::error::{StoreError, StoreResult};
use rusqlite::Connection;

/// Row operation a rule reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAction {
    Insert,
    Update,
    Delete,
}

impl RuleAction {
    fn as_sql(self) -> &'static str {
        match self {
            RuleAction::Insert => "INSERT",
            RuleAction::Update => "UPDATE",
            RuleAction::Delete => "DELETE",
        }
    }

    /// Trigger row alias that carries the affected row's values.
    fn row_alias(self) -> &'static str {
        match self {
            RuleAction::Delete => "old",
            RuleAction::Insert | RuleAction::Update => "new",
        }
    }
}

/// Fires after every row of `table` affected by `action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleEvent {
    pub action: RuleAction,
    pub table: &'static str,
}

/// What a rule does when its event fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleEffect {
    /// Delete rows of `table` whose `foreign_key` equals the deleted row's `parent_key`.
    CascadeDelete {
        table: &'static str,
        foreign_key: &'static str,
        parent_key: &'static str,
    },
    /// Add the affected row's `addends` to `table.counter` on the parent row
    /// whose `key` equals the affected row's `foreign_key`.
    ///
    /// This is a pure increment: old values are never subtracted.
    Accumulate {
        table: &'static str,
        counter: &'static str,
        key: &'static str,
        foreign_key: &'static str,
        addends: &'static [&'static str],
    },
}

impl RuleEffect {
    fn to_sql(&self, row: &str) -> String {
        match self {
            RuleEffect::CascadeDelete {
                table,
                foreign_key,
                parent_key,
            } => format!("DELETE FROM {table} WHERE {foreign_key} = {row}.{parent_key};"),
            RuleEffect::Accumulate {
                table,
                counter,
                key,
                foreign_key,
                addends,
            } => {
                let sum: String = addends
                    .iter()
                    .map(|a| format!(" + {row}.{a}"))
                    .collect();
                format!(
                    "UPDATE {table} SET {counter} = {counter}{sum} WHERE {key} = {row}.{foreign_key};"
                )
            }
        }
    }
}

/// A named rule, materialized as one trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegrityRule {
    pub name: &'static str,
    pub event: RuleEvent,
    pub effects: &'static [RuleEffect],
}

impl IntegrityRule {
    /// `CREATE TRIGGER` statement for this rule.
    pub fn to_sql(&self) -> String {
        let row = self.event.action.row_alias();
        let body: Vec<String> = self.effects.iter().map(|e| e.to_sql(row)).collect();
        format!(
            "CREATE TRIGGER {} AFTER {} ON {} BEGIN {} END",
            self.name,
            self.event.action.as_sql(),
            self.event.table,
            body.join(" ")
        )
    }
}

const TASK_DIRTY_ADDENDS: &[&str] = &[tasks::DIRTY, tasks::DELETED];

const MAKE_LIST_DIRTY: RuleEffect = RuleEffect::Accumulate {
    table: lists::TABLE,
    counter: lists::DIRTY,
    key: lists::ID,
    foreign_key: tasks::LIST_ID,
    addends: TASK_DIRTY_ADDENDS,
};

/// The rule set installed on every store.
pub static INTEGRITY_RULES: &[IntegrityRule] = &[
    IntegrityRule {
        name: "task_list_cleanup_trigger",
        event: RuleEvent {
            action: RuleAction::Delete,
            table: lists::TABLE,
        },
        effects: &[RuleEffect::CascadeDelete {
            table: tasks::TABLE,
            foreign_key: tasks::LIST_ID,
            parent_key: lists::ID,
        }],
    },
    IntegrityRule {
        name: "task_cleanup_trigger",
        event: RuleEvent {
            action: RuleAction::Delete,
            table: tasks::TABLE,
        },
        effects: &[
            RuleEffect::CascadeDelete {
                table: properties::TABLE,
                foreign_key: properties::TASK_ID,
                parent_key: tasks::ID,
            },
            RuleEffect::CascadeDelete {
                table: instances::TABLE,
                foreign_key: instances::TASK_ID,
                parent_key: tasks::ID,
            },
        ],
    },
    IntegrityRule {
        name: "task_list_make_dirty_on_insert",
        event: RuleEvent {
            action: RuleAction::Insert,
            table: tasks::TABLE,
        },
        effects: &[MAKE_LIST_DIRTY],
    },
    IntegrityRule {
        name: "task_list_make_dirty_on_update",
        event: RuleEvent {
            action: RuleAction::Update,
            table: tasks::TABLE,
        },
        effects: &[MAKE_LIST_DIRTY],
    },
];

/// Check every table and column a rule names.
///
/// Rules are installed on every historical table shape, so they may only
/// reference columns of the baseline schema.
pub fn validate_rules(
    catalog: &Catalog,
    deltas: &[Delta],
    rules: &[IntegrityRule],
) -> StoreResult<()> {
    let check = |rule: &IntegrityRule, table: &str, column: Option<&str>| {
        check_reference(catalog, deltas, rule, table, column)
    };

    let mut names = std::collections::HashSet::new();
    for rule in rules {
        if !names.insert(rule.name) {
            return Err(definition_error(format!("duplicate rule '{}'", rule.name)));
        }
        if rule.effects.is_empty() {
            return Err(definition_error(format!("rule '{}' has no effects", rule.name)));
        }
        let event_table = rule.event.table;
        check(rule, event_table, None)?;

        for effect in rule.effects {
            match *effect {
                RuleEffect::CascadeDelete {
                    table,
                    foreign_key,
                    parent_key,
                } => {
                    if rule.event.action != RuleAction::Delete {
                        return Err(definition_error(format!(
                            "rule '{}' cascades on {} instead of DELETE",
                            rule.name,
                            rule.event.action.as_sql()
                        )));
                    }
                    check(rule, table, Some(foreign_key))?;
                    check(rule, event_table, Some(parent_key))?;
                }
                RuleEffect::Accumulate {
                    table,
                    counter,
                    key,
                    foreign_key,
                    addends,
                } => {
                    if rule.event.action == RuleAction::Delete {
                        return Err(definition_error(format!(
                            "rule '{}' accumulates on DELETE, which has no new row",
                            rule.name
                        )));
                    }
                    check(rule, table, Some(counter))?;
                    check(rule, table, Some(key))?;
                    check(rule, event_table, Some(foreign_key))?;
                    for &addend in addends {
                        check(rule, event_table, Some(addend))?;
                    }
                }
            }
        }
    }
    Ok(())
}

fn check_reference(
    catalog: &Catalog,
    deltas: &[Delta],
    rule: &IntegrityRule,
    table: &str,
    column: Option<&str>,
) -> StoreResult<()> {
    let Some(column) = column else {
        if catalog.table(table).is_none() {
            return Err(definition_error(format!(
                "rule '{}' references unknown table '{table}'",
                rule.name
            )));
        }
        return Ok(());
    };
    if !catalog.has_column(table, column) {
        return Err(definition_error(format!(
            "rule '{}' references unknown column '{table}.{column}'",
            rule.name
        )));
    }
    let since = introduced_at(deltas, table, column);
    if since > BASELINE_VERSION {
        return Err(definition_error(format!(
            "rule '{}' references '{table}.{column}', added in v{since}",
            rule.name
        )));
    }
    Ok(())
}

/// Create (or replace) the trigger of every rule.
pub fn install_rules(conn: &Connection, rules: &[IntegrityRule]) -> StoreResult<()> {
    for rule in rules {
        log::debug!("Installing integrity rule {}", rule.name);
        conn.execute_batch(&format!("DROP TRIGGER IF EXISTS {}", rule.name))
            .and_then(|()| conn.execute_batch(&rule.to_sql()))
            .map_err(|e| {
                StoreError::IntegrityRuleInstallError(format!("trigger {}: {e}", rule.name))
            })?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "rules_test.rs"]
mod tests;
