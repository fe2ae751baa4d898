use rusqlite::Connection;
use tasklists_core::db::schema::schema_version;
use tasklists_core::db::{open_db, open_db_in_memory, DbError};
use tasklists_core::{RepoError, SqliteTaskListRepository, TaskListRepository};

#[test]
fn open_db_in_memory_creates_schema() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(user_version(&conn), schema_version());
    assert_table_exists(&conn, "task_lists");
    assert_table_exists(&conn, "tasks");
}

#[test]
fn connections_enforce_foreign_keys() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn reopening_file_database_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasklists.sqlite3");

    let list_id = {
        let conn = open_db(&path).unwrap();
        let repo = SqliteTaskListRepository::try_new(&conn).unwrap();
        let list = repo.create_list("Groceries").unwrap();
        repo.create_task(list.id, "Milk", "2L").unwrap();
        list.id
    };

    let conn = open_db(&path).unwrap();
    assert_eq!(user_version(&conn), schema_version());
    let repo = SqliteTaskListRepository::try_new(&conn).unwrap();
    let list = repo.get_list(list_id).unwrap();
    assert_eq!(list.name, "Groceries");
    assert_eq!(list.tasks.len(), 1);
    assert_eq!(list.tasks[0].note, "2L");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, schema_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn repository_rejects_unbootstrapped_connection() {
    let conn = Connection::open_in_memory().unwrap();
    match SqliteTaskListRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        }) => {
            assert_eq!(expected_version, schema_version());
            assert_eq!(actual_version, 0);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("raw connection must be rejected"),
    }
}

#[test]
fn repository_rejects_connection_missing_tables() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", schema_version()))
        .unwrap();
    match SqliteTaskListRepository::try_new(&conn) {
        Err(RepoError::MissingRequiredTable(table)) => assert_eq!(table, "task_lists"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("connection without tables must be rejected"),
    }
}

fn user_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
