//! Task list repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Own the lifetime of every task list and task.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Each write runs in one `IMMEDIATE` transaction; readers never observe a
//!   partially applied mutation.
//! - Multi-statement reads run in one transaction and see one snapshot.
//! - Deleting a list deletes its tasks in the same transaction.
//! - `is_complete` of a stored task changes only through
//!   `toggle_task_complete` and `mark_list_done`.
//! - `create_lists_if_empty` checks emptiness and inserts in the same
//!   transaction, so concurrent callers cannot both import.
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::clock::{Clock, SystemClock};
use crate::db::schema::{current_user_version, schema_version, table_exists, REQUIRED_TABLES};
use crate::db::DbError;
use crate::model::task::{normalize_task_name, ModelValidationError, Task, TaskId};
use crate::model::task_list::{normalize_list_name, TaskList, TaskListId};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const LIST_SELECT_SQL: &str = "SELECT
    seq,
    list_uuid,
    name,
    created_at
FROM task_lists";

const TASK_SELECT_SQL: &str = "SELECT
    seq,
    task_uuid,
    list_uuid,
    name,
    note,
    is_complete
FROM tasks";

pub type RepoResult<T> = Result<T, RepoError>;

/// Coarse error classes surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Empty or invalid input; re-prompt and retry.
    Validation,
    /// Stale or unknown id; refresh the view and drop the reference.
    NotFound,
    /// Persistence failure; the operation failed, the process stays usable.
    Storage,
}

impl ErrorKind {
    /// Stable code used across the FFI boundary.
    pub fn code(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Storage => "storage",
        }
    }
}

/// Repository error for task list persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ModelValidationError),
    ListNotFound(TaskListId),
    TaskNotFound(TaskId),
    Db(DbError),
    InvalidData(String),
    /// Connection schema is not at the version this binary writes.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl RepoError {
    /// Maps the error onto its caller-facing class.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::ListNotFound(_) | Self::TaskNotFound(_) => ErrorKind::NotFound,
            Self::Db(_)
            | Self::InvalidData(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_) => ErrorKind::Storage,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ListNotFound(id) => write!(f, "task list not found: {id}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "task list repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "task list repository requires table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelValidationError> for RepoError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Task to insert as part of a [`ListDraft`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskDraft<'a> {
    pub name: &'a str,
    pub note: &'a str,
    pub is_complete: bool,
}

/// List with its tasks, inserted in one go by
/// [`TaskListRepository::create_lists_if_empty`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListDraft<'a> {
    pub name: &'a str,
    pub tasks: &'a [TaskDraft<'a>],
}

/// Repository interface for task lists and their tasks.
pub trait TaskListRepository {
    /// Inserts a list with no tasks and `created_at = now`.
    fn create_list(&self, name: &str) -> RepoResult<TaskList>;
    /// Replaces a list name.
    fn rename_list(&self, id: TaskListId, new_name: &str) -> RepoResult<()>;
    /// Deletes a list and every task it owns.
    fn delete_list(&self, id: TaskListId) -> RepoResult<()>;
    /// Completes every current task of a list. Returns how many changed.
    fn mark_list_done(&self, id: TaskListId) -> RepoResult<usize>;
    /// Appends a current task to a list.
    fn create_task(&self, list_id: TaskListId, name: &str, note: &str) -> RepoResult<Task>;
    /// Replaces task name and note; completion state is untouched.
    fn edit_task(&self, id: TaskId, new_name: &str, new_note: &str) -> RepoResult<()>;
    /// Removes a task from its owning list.
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
    /// Flips completion state. Returns the new `is_complete` value.
    fn toggle_task_complete(&self, id: TaskId) -> RepoResult<bool>;
    /// Loads one list with its tasks in storage order.
    fn get_list(&self, id: TaskListId) -> RepoResult<TaskList>;
    /// Loads every list with its tasks, in storage order.
    fn all_lists(&self) -> RepoResult<Vec<TaskList>>;
    /// Loads one task.
    fn get_task(&self, id: TaskId) -> RepoResult<Task>;
    /// Inserts `drafts` in order when the store holds no lists.
    ///
    /// Returns `false` without writing when any list exists. All drafts are
    /// written or none are.
    fn create_lists_if_empty(&self, drafts: &[ListDraft<'_>]) -> RepoResult<bool>;
}

/// SQLite-backed task list repository.
pub struct SqliteTaskListRepository<'conn, C: Clock = SystemClock> {
    conn: &'conn Connection,
    clock: C,
}

impl<'conn> SqliteTaskListRepository<'conn, SystemClock> {
    /// Creates a repository on a bootstrapped connection using wall-clock time.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Self::with_clock(conn, SystemClock)
    }
}

impl<'conn, C: Clock> SqliteTaskListRepository<'conn, C> {
    /// Creates a repository that stamps `created_at` from `clock`.
    pub fn with_clock(conn: &'conn Connection, clock: C) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn, clock })
    }

    fn write_tx(&self) -> RepoResult<Transaction<'conn>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Immediate,
        )?)
    }

    fn read_tx(&self) -> RepoResult<Transaction<'conn>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Deferred,
        )?)
    }
}

impl<C: Clock> TaskListRepository for SqliteTaskListRepository<'_, C> {
    fn create_list(&self, name: &str) -> RepoResult<TaskList> {
        let mut list = TaskList::new(name, self.clock.now_epoch_ms())?;

        let tx = self.write_tx()?;
        tx.execute(
            "INSERT INTO task_lists (list_uuid, name, created_at) VALUES (?1, ?2, ?3);",
            params![list.id.to_string(), list.name.as_str(), list.created_at],
        )?;
        list.seq = tx.last_insert_rowid();
        tx.commit()?;

        debug!(
            "event=list_insert module=repo status=ok list_id={} seq={}",
            list.id, list.seq
        );
        Ok(list)
    }

    fn rename_list(&self, id: TaskListId, new_name: &str) -> RepoResult<()> {
        let name = normalize_list_name(new_name)?;
        let tx = self.write_tx()?;
        let changed = tx.execute(
            "UPDATE task_lists
             SET name = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE list_uuid = ?1;",
            params![id.to_string(), name],
        )?;
        if changed == 0 {
            return Err(RepoError::ListNotFound(id));
        }
        tx.commit()?;
        Ok(())
    }

    fn delete_list(&self, id: TaskListId) -> RepoResult<()> {
        let id_text = id.to_string();
        let tx = self.write_tx()?;
        let removed_tasks = tx.execute("DELETE FROM tasks WHERE list_uuid = ?1;", [&id_text])?;
        let changed = tx.execute("DELETE FROM task_lists WHERE list_uuid = ?1;", [&id_text])?;
        if changed == 0 {
            return Err(RepoError::ListNotFound(id));
        }
        tx.commit()?;

        debug!(
            "event=list_delete module=repo status=ok list_id={id} removed_tasks={removed_tasks}"
        );
        Ok(())
    }

    fn mark_list_done(&self, id: TaskListId) -> RepoResult<usize> {
        let tx = self.write_tx()?;
        ensure_list_exists(&tx, id)?;
        let changed = tx.execute(
            "UPDATE tasks
             SET is_complete = 1,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE list_uuid = ?1
               AND is_complete = 0;",
            [id.to_string()],
        )?;
        tx.commit()?;
        Ok(changed)
    }

    fn create_task(&self, list_id: TaskListId, name: &str, note: &str) -> RepoResult<Task> {
        let mut task = Task::new(list_id, name, note)?;

        let tx = self.write_tx()?;
        ensure_list_exists(&tx, list_id)?;
        tx.execute(
            "INSERT INTO tasks (task_uuid, list_uuid, name, note, is_complete)
             VALUES (?1, ?2, ?3, ?4, 0);",
            params![
                task.id.to_string(),
                list_id.to_string(),
                task.name.as_str(),
                task.note.as_str(),
            ],
        )?;
        task.seq = tx.last_insert_rowid();
        tx.commit()?;
        Ok(task)
    }

    fn edit_task(&self, id: TaskId, new_name: &str, new_note: &str) -> RepoResult<()> {
        let name = normalize_task_name(new_name)?;
        let tx = self.write_tx()?;
        let changed = tx.execute(
            "UPDATE tasks
             SET name = ?2,
                 note = ?3,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE task_uuid = ?1;",
            params![id.to_string(), name, new_note],
        )?;
        if changed == 0 {
            return Err(RepoError::TaskNotFound(id));
        }
        tx.commit()?;
        Ok(())
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let tx = self.write_tx()?;
        let changed = tx.execute("DELETE FROM tasks WHERE task_uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::TaskNotFound(id));
        }
        tx.commit()?;
        Ok(())
    }

    fn toggle_task_complete(&self, id: TaskId) -> RepoResult<bool> {
        let id_text = id.to_string();
        let tx = self.write_tx()?;
        let changed = tx.execute(
            "UPDATE tasks
             SET is_complete = 1 - is_complete,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE task_uuid = ?1;",
            [&id_text],
        )?;
        if changed == 0 {
            return Err(RepoError::TaskNotFound(id));
        }
        let raw: i64 = tx.query_row(
            "SELECT is_complete FROM tasks WHERE task_uuid = ?1;",
            [&id_text],
            |row| row.get(0),
        )?;
        let is_complete = parse_bool(raw, "tasks.is_complete")?;
        tx.commit()?;
        Ok(is_complete)
    }

    fn get_list(&self, id: TaskListId) -> RepoResult<TaskList> {
        let tx = self.read_tx()?;
        let mut list = tx
            .query_row(
                &format!("{LIST_SELECT_SQL} WHERE list_uuid = ?1;"),
                [id.to_string()],
                |row| Ok(parse_list_row(row)),
            )
            .optional()?
            .ok_or(RepoError::ListNotFound(id))??;

        let mut stmt = tx.prepare(&format!(
            "{TASK_SELECT_SQL} WHERE list_uuid = ?1 ORDER BY seq ASC;"
        ))?;
        let mut rows = stmt.query([id.to_string()])?;
        while let Some(row) = rows.next()? {
            list.tasks.push(parse_task_row(row)?);
        }
        drop(rows);
        drop(stmt);
        tx.commit()?;

        list.validate()?;
        Ok(list)
    }

    fn all_lists(&self) -> RepoResult<Vec<TaskList>> {
        let tx = self.read_tx()?;
        let mut lists = Vec::new();
        let mut index_by_id = HashMap::new();

        {
            let mut stmt = tx.prepare(&format!("{LIST_SELECT_SQL} ORDER BY seq ASC;"))?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let list = parse_list_row(row)?;
                index_by_id.insert(list.id, lists.len());
                lists.push(list);
            }
        }

        {
            let mut stmt = tx.prepare(&format!("{TASK_SELECT_SQL} ORDER BY seq ASC;"))?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let task = parse_task_row(row)?;
                let index = *index_by_id.get(&task.list_id).ok_or_else(|| {
                    RepoError::InvalidData(format!(
                        "task {} references missing list {}",
                        task.id, task.list_id
                    ))
                })?;
                lists[index].tasks.push(task);
            }
        }
        tx.commit()?;

        for list in &lists {
            list.validate()?;
        }
        Ok(lists)
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Task> {
        let task = self
            .conn
            .query_row(
                &format!("{TASK_SELECT_SQL} WHERE task_uuid = ?1;"),
                [id.to_string()],
                |row| Ok(parse_task_row(row)),
            )
            .optional()?
            .ok_or(RepoError::TaskNotFound(id))??;
        task.validate()?;
        Ok(task)
    }

    fn create_lists_if_empty(&self, drafts: &[ListDraft<'_>]) -> RepoResult<bool> {
        let tx = self.write_tx()?;
        let has_lists: i64 = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM task_lists);",
            [],
            |row| row.get(0),
        )?;
        if has_lists == 1 {
            return Ok(false);
        }

        let mut task_count = 0usize;
        for draft in drafts {
            let list = TaskList::new(draft.name, self.clock.now_epoch_ms())?;
            tx.execute(
                "INSERT INTO task_lists (list_uuid, name, created_at) VALUES (?1, ?2, ?3);",
                params![list.id.to_string(), list.name.as_str(), list.created_at],
            )?;
            for task_draft in draft.tasks {
                let task = Task::new(list.id, task_draft.name, task_draft.note)?;
                tx.execute(
                    "INSERT INTO tasks (task_uuid, list_uuid, name, note, is_complete)
                     VALUES (?1, ?2, ?3, ?4, ?5);",
                    params![
                        task.id.to_string(),
                        list.id.to_string(),
                        task.name.as_str(),
                        task.note.as_str(),
                        task_draft.is_complete,
                    ],
                )?;
                task_count += 1;
            }
        }
        tx.commit()?;

        debug!(
            "event=lists_import module=repo status=ok lists={} tasks={task_count}",
            drafts.len()
        );
        Ok(true)
    }
}

fn ensure_list_exists(conn: &Connection, id: TaskListId) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM task_lists WHERE list_uuid = ?1);",
        [id.to_string()],
        |row| row.get(0),
    )?;
    if exists == 1 {
        Ok(())
    } else {
        Err(RepoError::ListNotFound(id))
    }
}

fn parse_list_row(row: &Row<'_>) -> RepoResult<TaskList> {
    let id_text: String = row.get("list_uuid")?;
    Ok(TaskList {
        id: parse_uuid(&id_text, "task_lists.list_uuid")?,
        seq: row.get("seq")?,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
        tasks: Vec::new(),
    })
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("task_uuid")?;
    let list_text: String = row.get("list_uuid")?;
    Ok(Task {
        id: parse_uuid(&id_text, "tasks.task_uuid")?,
        list_id: parse_uuid(&list_text, "tasks.list_uuid")?,
        seq: row.get("seq")?,
        name: row.get("name")?,
        note: row.get("note")?,
        is_complete: parse_bool(row.get("is_complete")?, "tasks.is_complete")?,
    })
}

fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

fn parse_bool(value: i64, column: &'static str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = schema_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &table in REQUIRED_TABLES {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }
    Ok(())
}
