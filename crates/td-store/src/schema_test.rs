use super::*;
use crate::catalog::tables::{self, instances, tasks};
use crate::catalog::{IndexDef, CURRENT_VERSION};
use crate::error::StoreError;

fn table(name: &str) -> &'static TableDef {
    current_schema().table(name).unwrap()
}

#[test]
fn current_schema_validates() {
    let schema = Schema::current();
    schema.validate().unwrap();
    assert_eq!(schema.version(), CURRENT_VERSION);
}

#[test]
fn known_versions_span_baseline_to_current() {
    let schema = Schema::current();
    assert!(!schema.is_known_version(0));
    assert!(schema.is_known_version(BASELINE_VERSION));
    assert!(schema.is_known_version(2));
    assert!(schema.is_known_version(CURRENT_VERSION));
    assert!(!schema.is_known_version(CURRENT_VERSION + 1));
}

#[test]
fn baseline_tasks_lack_status_flags() {
    let columns = Schema::current().columns_at(table(tasks::TABLE), 1);
    assert!(columns.contains(&tasks::STATUS));
    assert!(!columns.contains(&"is_new"));
    assert!(!columns.contains(&"is_closed"));
}

#[test]
fn status_flags_appear_at_v2() {
    let schema = Schema::current();
    let columns = schema.columns_at(table(tasks::TABLE), 2);
    assert!(columns.contains(&"is_new"));
    assert!(columns.contains(&"is_closed"));
    assert_eq!(
        columns.len(),
        schema.columns_at(table(tasks::TABLE), 1).len() + 2
    );
}

#[test]
fn sorting_columns_appear_at_v3() {
    let schema = Schema::current();
    let instances_table = table(instances::TABLE);
    assert_eq!(
        schema.columns_at(instances_table, 2),
        vec!["_id", "task_id", "instance_start", "instance_due", "instance_duration"]
    );
    assert_eq!(schema.columns_at(instances_table, 3).len(), 7);
}

#[test]
fn historical_create_sql_omits_later_columns() {
    let sql = Schema::current().create_table_sql_at(table(instances::TABLE), 1);
    assert_eq!(
        sql,
        "CREATE TABLE Instances (_id INTEGER PRIMARY KEY AUTOINCREMENT, \
         task_id INTEGER NOT NULL, instance_start INTEGER, instance_due INTEGER, \
         instance_duration INTEGER)"
    );
}

#[test]
fn current_create_sql_matches_catalog() {
    let schema = Schema::current();
    for t in schema.catalog.tables {
        assert_eq!(schema.create_table_sql_at(t, CURRENT_VERSION), t.create_sql());
    }
}

#[test]
fn pending_uses_registry() {
    let versions: Vec<u32> = Schema::current()
        .pending(1, CURRENT_VERSION)
        .iter()
        .map(|d| d.version)
        .collect();
    assert_eq!(versions, vec![2, 3]);
}

#[test]
fn index_on_delta_column_rejected() {
    static INDICES: &[IndexDef] = &[IndexDef {
        table: instances::TABLE,
        columns: &["instance_start_sorting"],
    }];
    let catalog = Catalog {
        version: CURRENT_VERSION,
        tables: tables::TABLES,
        indices: INDICES,
        views: &[],
    };
    let schema = Schema {
        catalog: &catalog,
        ..Schema::current()
    };
    match schema.validate() {
        Err(StoreError::SchemaDefinitionError(msg)) => {
            assert!(msg.contains("added in v3"), "{msg}")
        }
        other => panic!("expected SchemaDefinitionError, got {other:?}"),
    }
}

#[test]
fn mismatched_catalog_version_rejected() {
    let catalog = Catalog {
        version: CURRENT_VERSION + 1,
        ..*current_schema()
    };
    let schema = Schema {
        catalog: &catalog,
        ..Schema::current()
    };
    assert!(matches!(
        schema.validate(),
        Err(StoreError::SchemaDefinitionError(_))
    ));
}

#[test]
fn ddl_lists_every_object_in_install_order() {
    let ddl = Schema::current().ddl_at(CURRENT_VERSION);
    assert_eq!(ddl.len(), 5 + 3 + 4 + 2);
    assert!(ddl[0].starts_with("CREATE TABLE Lists"));
    assert!(ddl[5].starts_with("CREATE INDEX"));
    assert!(ddl[8].starts_with("CREATE TRIGGER"));
    assert!(ddl[13].starts_with("CREATE VIEW Instance_View"));
}

#[test]
fn ddl_at_baseline_uses_historical_tables() {
    let ddl = Schema::current().ddl_at(BASELINE_VERSION);
    assert!(!ddl.iter().any(|stmt| stmt.contains("is_new")));
    assert!(!ddl.iter().any(|stmt| stmt.contains("_sorting")));
}

#[test]
fn ddl_builds_a_working_store() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    for stmt in Schema::current().ddl_at(CURRENT_VERSION) {
        conn.execute_batch(&stmt).unwrap();
    }
    let triggers: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'trigger'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(triggers, 4);
}
