use super::*;
use crate::bootstrap::bootstrap;
use crate::schema::Schema;
use td_core::SeedList;

fn bootstrapped() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    bootstrap(&conn, &Schema::current(), &SeedList::default()).unwrap();
    conn
}

#[test]
fn execute_query_coerces_values_to_strings() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE t (i INTEGER, r REAL, s TEXT, b BLOB, n INTEGER);
         INSERT INTO t VALUES (42, 1.5, 'hello', x'0aff', NULL);",
    )
    .unwrap();

    let result = execute_query(&conn, "SELECT i, r, s, b, n FROM t").unwrap();
    assert_eq!(result.columns, vec!["i", "r", "s", "b", "n"]);
    assert_eq!(result.rows, vec![vec!["42", "1.5", "hello", "0aff", "null"]]);
}

#[test]
fn execute_query_on_empty_result() {
    let conn = bootstrapped();
    let result = execute_query(&conn, "SELECT _id, title FROM Tasks").unwrap();
    assert_eq!(result.columns, vec!["_id", "title"]);
    assert!(result.rows.is_empty());
}

#[test]
fn execute_query_reports_bad_sql() {
    let conn = bootstrapped();
    let err = execute_query(&conn, "SELECT nope FROM Tasks").unwrap_err();
    assert!(matches!(err, StoreError::QueryError(_)));
    assert!(err.to_string().starts_with("[S008]"));
}

#[test]
fn list_objects_skips_sqlite_internals() {
    let conn = bootstrapped();
    // AUTOINCREMENT creates sqlite_sequence
    assert!(relation_exists(&conn, "sqlite_sequence").unwrap());
    assert_eq!(
        list_objects(&conn, ObjectKind::Table).unwrap(),
        vec!["Categories", "Instances", "Lists", "Properties", "Tasks"]
    );
}

#[test]
fn list_objects_by_kind() {
    let conn = bootstrapped();
    assert_eq!(
        list_objects(&conn, ObjectKind::Index).unwrap(),
        vec![
            "Instances_task_id_idx",
            "Lists_account_name_idx",
            "Tasks_status_idx",
        ]
    );
    assert_eq!(
        list_objects(&conn, ObjectKind::View).unwrap(),
        vec!["Instance_View", "Task_View"]
    );
    assert_eq!(
        list_objects(&conn, ObjectKind::Trigger).unwrap(),
        vec![
            "task_cleanup_trigger",
            "task_list_cleanup_trigger",
            "task_list_make_dirty_on_insert",
            "task_list_make_dirty_on_update",
        ]
    );
}

#[test]
fn relation_exists_covers_tables_and_views() {
    let conn = bootstrapped();
    assert!(relation_exists(&conn, "Lists").unwrap());
    assert!(relation_exists(&conn, "Task_View").unwrap());
    assert!(!relation_exists(&conn, "Tasks_status_idx").unwrap());
    assert!(!relation_exists(&conn, "Alarms").unwrap());
}

#[test]
fn table_columns_reports_constraints() {
    let conn = bootstrapped();
    let columns = table_columns(&conn, "Tasks").unwrap();

    let id = &columns[0];
    assert_eq!(id.name, "_id");
    assert!(id.primary_key);

    let list_id = columns.iter().find(|c| c.name == "list_id").unwrap();
    assert!(list_id.not_null);
    assert_eq!(list_id.declared_type, "INTEGER");

    let dirty = columns.iter().find(|c| c.name == "_dirty").unwrap();
    assert_eq!(dirty.default.as_deref(), Some("1"));
}

#[test]
fn table_columns_rejects_bad_identifier() {
    let conn = bootstrapped();
    let err = table_columns(&conn, "Tasks); DROP TABLE Lists; --").unwrap_err();
    assert!(matches!(err, StoreError::QueryError(_)));
    assert!(relation_exists(&conn, "Lists").unwrap());
}

#[test]
fn row_count_of_seeded_store() {
    let conn = bootstrapped();
    assert_eq!(table_row_count(&conn, "Lists").unwrap(), 1);
    assert_eq!(table_row_count(&conn, "Tasks").unwrap(), 0);
    assert!(table_row_count(&conn, "").is_err());
}

#[test]
fn summarize_reports_version_and_objects() {
    let conn = bootstrapped();
    let summary = summarize(&conn).unwrap();

    assert_eq!(summary.version, 3);
    assert_eq!(summary.tables.len(), 5);
    let lists = summary.tables.iter().find(|t| t.name == "Lists").unwrap();
    assert_eq!(lists.rows, 1);
    assert_eq!(summary.indices.len(), 3);
    assert_eq!(summary.views.len(), 2);
    assert_eq!(summary.triggers.len(), 4);
}
