//! Triggers and views: objects derived from the rule set and the catalog.
//!
//! They are rebuilt wholesale on every migration so nothing from a previous
//! version is left behind.

use crate::error::{StoreError, StoreResult};
use crate::query::{list_objects, ObjectKind};
use crate::rules::install_rules;
use crate::schema::Schema;
use rusqlite::Connection;

/// Drop every trigger and view currently in the store.
pub fn drop_derived_objects(conn: &Connection) -> StoreResult<()> {
    for trigger in list_objects(conn, ObjectKind::Trigger)? {
        log::debug!("Dropping trigger {trigger}");
        conn.execute_batch(&format!("DROP TRIGGER IF EXISTS \"{trigger}\""))
            .map_err(|e| {
                StoreError::IntegrityRuleInstallError(format!("drop trigger {trigger}: {e}"))
            })?;
    }
    for view in list_objects(conn, ObjectKind::View)? {
        log::debug!("Dropping view {view}");
        conn.execute_batch(&format!("DROP VIEW IF EXISTS \"{view}\""))
            .map_err(|e| StoreError::IntegrityRuleInstallError(format!("drop view {view}: {e}")))?;
    }
    Ok(())
}

/// Install the schema's integrity rules and views.
pub fn install_derived_objects(conn: &Connection, schema: &Schema<'_>) -> StoreResult<()> {
    install_rules(conn, schema.rules)?;
    for view in schema.catalog.views {
        log::debug!("Creating view {}", view.name);
        conn.execute_batch(&format!("DROP VIEW IF EXISTS {}", view.name))
            .and_then(|()| conn.execute_batch(&view.create_sql()))
            .map_err(|e| StoreError::IntegrityRuleInstallError(format!("view {}: {e}", view.name)))?;
    }
    Ok(())
}
