use cursus_core::db::migrations::latest_version;
use cursus_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "node_statuses");
    assert_index_exists(&conn, "idx_node_statuses_project");
}

#[test]
fn reopening_file_database_keeps_schema_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cursus.db");

    let first = open_db(&path).unwrap();
    assert_eq!(schema_version(&first), latest_version());
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second), latest_version());
    assert_table_exists(&second, "node_statuses");
}

#[test]
fn database_from_newer_build_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 42;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 42);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn status_column_rejects_unknown_values() {
    let conn = open_db_in_memory().unwrap();
    let result = conn.execute(
        "INSERT INTO node_statuses (session_id, project_id, node_id, status, updated_at)
         VALUES ('s', 'p', 'n', 'done', 0);",
        [],
    );
    assert!(result.is_err());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, name: &str) {
    assert!(schema_object_exists(conn, "table", name), "table {name} does not exist");
}

fn assert_index_exists(conn: &Connection, name: &str) {
    assert!(schema_object_exists(conn, "index", name), "index {name} does not exist");
}

fn schema_object_exists(conn: &Connection, kind: &str, name: &str) -> bool {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = ?1 AND name = ?2);",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap();
    exists == 1
}
