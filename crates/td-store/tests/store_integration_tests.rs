//! Integration tests for task store bootstrap, migration, and integrity rules.
//!
//! Stores are built through the public td-store API and then inspected with
//! plain SQL, the way a sync adapter or UI layer would see them.

use rusqlite::Connection;
use std::collections::BTreeSet;
use td_core::{Config, TaskStatus};
use td_store::query::{execute_query, list_objects, table_columns, ObjectKind};
use td_store::version::read_version;
use td_store::{bootstrap_at_version, OpenOutcome, Schema, TaskDb, CURRENT_VERSION};

// ── Helpers ────────────────────────────────────────────────────────────

fn test_config() -> Config {
    serde_yaml::from_str(
        r##"
database:
  path: ":memory:"
  busy_timeout_ms: 1000
seed:
  account_name: Local
  list_name: Task list
  list_color: "#0000ff"
"##,
    )
    .unwrap()
}

fn open_fresh() -> TaskDb {
    TaskDb::open_memory(&test_config()).unwrap()
}

fn scalar(conn: &Connection, sql: &str) -> i64 {
    conn.query_row(sql, [], |r| r.get(0)).unwrap()
}

fn insert_list(conn: &Connection, name: &str) -> i64 {
    conn.execute(
        "INSERT INTO Lists (account_name, account_type, list_name, visible, sync_enabled) \
         VALUES ('Local', 'LOCAL', ?1, 1, 1)",
        [name],
    )
    .unwrap();
    conn.last_insert_rowid()
}

fn insert_task(conn: &Connection, list_id: i64, status: TaskStatus) -> i64 {
    conn.execute(
        "INSERT INTO Tasks (list_id, title, status, is_new, is_closed) \
         VALUES (?1, 'task', ?2, ?3, ?4)",
        rusqlite::params![list_id, status.code(), status.is_new(), status.is_closed()],
    )
    .unwrap();
    conn.last_insert_rowid()
}

fn insert_children(conn: &Connection, task_id: i64) {
    conn.execute(
        "INSERT INTO Instances (task_id, instance_start, instance_due) VALUES (?1, 100, 200)",
        [task_id],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO Properties (task_id, mimetype, data0) VALUES (?1, 1, 'alarm')",
        [task_id],
    )
    .unwrap();
}

fn list_dirty(conn: &Connection, list_id: i64) -> i64 {
    conn.query_row("SELECT _dirty FROM Lists WHERE _id = ?1", [list_id], |r| {
        r.get(0)
    })
    .unwrap()
}

/// Everything about a store that must not depend on how it reached a version.
#[derive(Debug, PartialEq)]
struct Shape {
    version: u32,
    columns: Vec<(String, BTreeSet<(String, String, bool, Option<String>)>)>,
    indices: Vec<String>,
    triggers: Vec<String>,
    views: Vec<String>,
    lists: Vec<Vec<String>>,
}

fn shape(conn: &Connection) -> Shape {
    // ALTER appends columns, so compare column sets rather than order
    let columns = list_objects(conn, ObjectKind::Table)
        .unwrap()
        .into_iter()
        .map(|table| {
            let set: BTreeSet<_> = table_columns(conn, &table)
                .unwrap()
                .into_iter()
                .map(|c| (c.name, c.declared_type, c.not_null, c.default))
                .collect();
            (table, set)
        })
        .collect();
    Shape {
        version: read_version(conn).unwrap(),
        columns,
        indices: list_objects(conn, ObjectKind::Index).unwrap(),
        triggers: list_objects(conn, ObjectKind::Trigger).unwrap(),
        views: list_objects(conn, ObjectKind::View).unwrap(),
        lists: execute_query(conn, "SELECT * FROM Lists ORDER BY _id")
            .unwrap()
            .rows,
    }
}

// ── Cascades ───────────────────────────────────────────────────────────

#[test]
fn deleting_list_cascades_through_tasks() {
    let db = open_fresh();
    let conn = db.conn();
    let doomed = insert_list(conn, "Doomed");
    let kept = insert_list(conn, "Kept");

    for _ in 0..3 {
        let task = insert_task(conn, doomed, TaskStatus::NeedsAction);
        insert_children(conn, task);
    }
    let survivor = insert_task(conn, kept, TaskStatus::Completed);
    insert_children(conn, survivor);
    conn.execute(
        "INSERT INTO Categories (account_name, account_type, name) VALUES ('Local', 'LOCAL', 'work')",
        [],
    )
    .unwrap();

    conn.execute("DELETE FROM Lists WHERE _id = ?1", [doomed])
        .unwrap();

    assert_eq!(scalar(conn, "SELECT COUNT(*) FROM Tasks"), 1);
    assert_eq!(scalar(conn, "SELECT COUNT(*) FROM Instances"), 1);
    assert_eq!(scalar(conn, "SELECT COUNT(*) FROM Properties"), 1);
    assert_eq!(
        scalar(conn, "SELECT COUNT(*) FROM Instances WHERE task_id NOT IN (SELECT _id FROM Tasks)"),
        0
    );
    assert_eq!(
        scalar(conn, "SELECT COUNT(*) FROM Properties WHERE task_id NOT IN (SELECT _id FROM Tasks)"),
        0
    );
    // categories are independent
    assert_eq!(scalar(conn, "SELECT COUNT(*) FROM Categories"), 1);
}

#[test]
fn cascade_rolls_back_with_transaction() {
    let db = open_fresh();
    let task = insert_task(db.conn(), 1, TaskStatus::NeedsAction);
    insert_children(db.conn(), task);

    let result: td_store::StoreResult<()> = db.transaction(|conn| {
        conn.execute("DELETE FROM Lists WHERE _id = 1", [])?;
        Err(td_store::StoreError::QueryError("abort".to_string()))
    });
    assert!(result.is_err());

    assert_eq!(scalar(db.conn(), "SELECT COUNT(*) FROM Lists"), 1);
    assert_eq!(scalar(db.conn(), "SELECT COUNT(*) FROM Tasks"), 1);
    assert_eq!(scalar(db.conn(), "SELECT COUNT(*) FROM Instances"), 1);
    assert_eq!(scalar(db.conn(), "SELECT COUNT(*) FROM Properties"), 1);
}

// ── Dirty accumulation ─────────────────────────────────────────────────

#[test]
fn dirty_counter_accumulates_task_writes() {
    let db = open_fresh();
    let conn = db.conn();
    assert_eq!(list_dirty(conn, 1), 0);

    let task = insert_task(conn, 1, TaskStatus::NeedsAction);
    assert_eq!(list_dirty(conn, 1), 1);

    // soft delete: new._dirty = 1, new._deleted = 1
    conn.execute("UPDATE Tasks SET _deleted = 1 WHERE _id = ?1", [task])
        .unwrap();
    assert_eq!(list_dirty(conn, 1), 3);
}

#[test]
fn dirty_counter_never_decreases() {
    let db = open_fresh();
    let conn = db.conn();
    let task = insert_task(conn, 1, TaskStatus::NeedsAction);
    conn.execute("UPDATE Tasks SET _dirty = 0 WHERE _id = ?1", [task])
        .unwrap();
    assert_eq!(list_dirty(conn, 1), 1);
    conn.execute("UPDATE Tasks SET title = 'again' WHERE _id = ?1", [task])
        .unwrap();
    assert_eq!(list_dirty(conn, 1), 1);
}

#[test]
fn dirty_counter_targets_owning_list_only() {
    let db = open_fresh();
    let conn = db.conn();
    let other = insert_list(conn, "Other");
    insert_task(conn, other, TaskStatus::InProcess);
    assert_eq!(list_dirty(conn, 1), 0);
    assert_eq!(list_dirty(conn, other), 1);
}

// ── Views ──────────────────────────────────────────────────────────────

#[test]
fn task_view_denormalizes_list_columns() {
    let db = open_fresh();
    insert_task(db.conn(), 1, TaskStatus::Completed);

    let result = execute_query(
        db.conn(),
        "SELECT title, is_closed, list_name, account_type, list_color, visible FROM Task_View",
    )
    .unwrap();
    assert_eq!(
        result.rows,
        vec![vec!["task", "1", "Task list", "LOCAL", "-16776961", "1"]]
    );
}

#[test]
fn instance_view_joins_every_instance() {
    let db = open_fresh();
    let task = insert_task(db.conn(), 1, TaskStatus::NeedsAction);
    insert_children(db.conn(), task);
    insert_children(db.conn(), task);

    assert_eq!(scalar(db.conn(), "SELECT COUNT(*) FROM Instance_View"), 2);
    assert_eq!(
        scalar(
            db.conn(),
            "SELECT COUNT(*) FROM Instance_View WHERE instance_start_sorting IS NULL"
        ),
        2
    );
}

// ── Migration convergence ──────────────────────────────────────────────

#[test]
fn every_old_version_converges_on_direct_bootstrap() {
    let direct = open_fresh();
    assert_eq!(direct.open_outcome(), OpenOutcome::Bootstrapped);
    let expected = shape(direct.conn());

    for from in [0u32, 1, 2] {
        let conn = Connection::open_in_memory().unwrap();
        let built_at = from.max(1);
        bootstrap_at_version(&conn, &Schema::current(), built_at, &test_config().seed).unwrap();
        if from == 0 {
            conn.execute_batch("PRAGMA user_version = 0").unwrap();
        }

        let db = TaskDb::from_connection(conn, &Schema::current(), &test_config()).unwrap();
        assert_eq!(db.open_outcome(), OpenOutcome::Upgraded { from });
        assert_eq!(shape(db.conn()), expected, "upgrade from v{from}");
    }
}

#[test]
fn migrated_data_matches_fresh_writes() {
    let conn = Connection::open_in_memory().unwrap();
    bootstrap_at_version(&conn, &Schema::current(), 1, &test_config().seed).unwrap();
    for status in TaskStatus::ALL {
        conn.execute(
            "INSERT INTO Tasks (list_id, title, status) VALUES (1, 'old', ?1)",
            [status.code()],
        )
        .unwrap();
    }
    conn.execute(
        "INSERT INTO Instances (task_id, instance_start, instance_due) VALUES (1, 100, 200)",
        [],
    )
    .unwrap();

    let db = TaskDb::from_connection(conn, &Schema::current(), &test_config()).unwrap();
    assert_eq!(db.version().unwrap(), CURRENT_VERSION);

    // backfilled rows agree with what a current writer stores
    let fresh = open_fresh();
    for status in TaskStatus::ALL {
        insert_task(fresh.conn(), 1, status);
    }
    let flags = "SELECT status, is_new, is_closed FROM Tasks ORDER BY _id";
    assert_eq!(
        execute_query(db.conn(), flags).unwrap().rows,
        execute_query(fresh.conn(), flags).unwrap().rows
    );
    assert_eq!(
        execute_query(
            db.conn(),
            "SELECT instance_start_sorting, instance_due_sorting FROM Instances"
        )
        .unwrap()
        .rows,
        vec![vec!["100", "200"]]
    );
}

#[test]
fn reopening_migrated_file_is_a_no_op() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("tasks.db");
    {
        let conn = Connection::open(&path).unwrap();
        bootstrap_at_version(&conn, &Schema::current(), 2, &test_config().seed).unwrap();
    }

    let db = TaskDb::open(&path, &test_config()).unwrap();
    assert_eq!(db.open_outcome(), OpenOutcome::Upgraded { from: 2 });
    let after_upgrade = shape(db.conn());
    db.close().unwrap();

    let db = TaskDb::open(&path, &test_config()).unwrap();
    assert_eq!(db.open_outcome(), OpenOutcome::UpToDate);
    assert_eq!(shape(db.conn()), after_upgrade);
}
