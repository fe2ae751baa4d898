//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the list and task operations the UI invokes, via FRB.
//! - Flatten core results into plain envelopes Dart can render directly.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failures carry a stable `error_code` (`validation|not_found|storage`)
//!   next to a human-readable diagnostic message.
//! - The store path is pinned once per process.

use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;
use tasklists_core::db::open_db;
use tasklists_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Badge, CoreConfig, ErrorKind, ListDetail, ListSummary, RepoError, RepoResult, SortMode,
    SqliteTaskListRepository, Task, TaskListRepository, TaskListService, TaskSection,
};
use uuid::Uuid;

static STORE: OnceLock<StoreSettings> = OnceLock::new();
static EXAMPLES_SEEDED: OnceLock<()> = OnceLock::new();

struct StoreSettings {
    db_path: PathBuf,
    seed_example_data: bool,
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the database file used by every later call and optionally seeds
/// example lists into an empty store.
///
/// Without this call the first operation falls back to `TASKLISTS_DB_PATH`
/// (or the temp directory) and `TASKLISTS_SEED_EXAMPLES`.
///
/// # FFI contract
/// - Same path again is a no-op apart from seeding.
/// - A different path after the store is pinned returns error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_store(db_path: String, seed_example_data: bool) -> String {
    match configure_store_inner(&db_path, seed_example_data) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One row of the lists screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub list_id: String,
    pub name: String,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
    /// Cell text: `✓` when every task is done, otherwise the current count.
    pub badge: String,
    pub all_done: bool,
    pub current_count: u32,
}

/// Lists screen envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListsResponse {
    pub ok: bool,
    /// Rows in `sort_mode` order. Empty on failure.
    pub items: Vec<ListRow>,
    /// Applied ordering (`by_date|by_name`).
    pub sort_mode: String,
    pub error_code: Option<String>,
    pub message: String,
}

/// One row of the tasks screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub task_id: String,
    pub name: String,
    pub note: String,
    pub is_complete: bool,
}

/// Tasks screen envelope with the current/completed sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDetailResponse {
    pub ok: bool,
    pub list_id: Option<String>,
    pub name: String,
    pub badge: String,
    pub current: Vec<TaskRow>,
    pub completed: Vec<TaskRow>,
    pub error_code: Option<String>,
    pub message: String,
}

/// Generic action envelope for list and task mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Affected entity ID.
    pub id: Option<String>,
    /// `current|completed` for task placements.
    pub section: Option<String>,
    /// Row index the entity now displays at.
    pub position: Option<u32>,
    pub error_code: Option<String>,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: impl ToString) -> Self {
        Self {
            ok: true,
            id: Some(id.to_string()),
            section: None,
            position: None,
            error_code: None,
            message: message.into(),
        }
    }

    fn placed(
        message: impl Into<String>,
        id: impl ToString,
        section: Option<TaskSection>,
        index: usize,
    ) -> Self {
        Self {
            section: section.map(|section| section_label(section).to_string()),
            position: Some(to_position(index)),
            ..Self::success(message, id)
        }
    }

    fn failure(err: FfiError) -> Self {
        Self {
            ok: false,
            id: None,
            section: None,
            position: None,
            error_code: Some(err.code.to_string()),
            message: err.message,
        }
    }
}

/// Lists with badges in the requested order (`by_date|by_name`).
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Unknown `sort_mode` returns a `validation` failure.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn lists_view(sort_mode: String) -> ListsResponse {
    let result = parse_sort_mode("lists_view", &sort_mode).and_then(|mode| {
        with_service("lists_view", |service| service.lists_overview(mode)).map(|rows| (mode, rows))
    });
    match result {
        Ok((mode, rows)) => ListsResponse {
            ok: true,
            message: format!("{} list(s).", rows.len()),
            items: rows.into_iter().map(to_list_row).collect(),
            sort_mode: mode.as_str().to_string(),
            error_code: None,
        },
        Err(err) => ListsResponse {
            ok: false,
            items: Vec::new(),
            sort_mode: sort_mode.trim().to_string(),
            error_code: Some(err.code.to_string()),
            message: err.message,
        },
    }
}

/// Current and completed tasks of one list, each in storage order.
#[flutter_rust_bridge::frb(sync)]
pub fn list_detail(list_id: String) -> ListDetailResponse {
    let result = parse_id("list_detail", &list_id)
        .and_then(|id| with_service("list_detail", |service| service.list_detail(id)));
    match result {
        Ok(detail) => to_detail_response(detail),
        Err(err) => ListDetailResponse {
            ok: false,
            list_id: None,
            name: String::new(),
            badge: String::new(),
            current: Vec::new(),
            completed: Vec::new(),
            error_code: Some(err.code.to_string()),
            message: err.message,
        },
    }
}

/// Creates a list and reports its row index under `sort_mode`.
#[flutter_rust_bridge::frb(sync)]
pub fn list_create(name: String, sort_mode: String) -> ActionResponse {
    let result = parse_sort_mode("list_create", &sort_mode).and_then(|mode| {
        with_service("list_create", |service| service.add_list(&name, mode))
    });
    match result {
        Ok(placement) => {
            ActionResponse::placed("List created.", placement.list.id, None, placement.index)
        }
        Err(err) => ActionResponse::failure(err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn list_rename(list_id: String, name: String) -> ActionResponse {
    run_action("list_rename", &list_id, "List renamed.", |service, id| {
        service.rename_list(id, &name)
    })
}

/// Deletes a list and all of its tasks.
#[flutter_rust_bridge::frb(sync)]
pub fn list_delete(list_id: String) -> ActionResponse {
    run_action("list_delete", &list_id, "List deleted.", |service, id| {
        service.delete_list(id)
    })
}

/// Completes every current task of a list. Repeat calls succeed and change
/// nothing.
#[flutter_rust_bridge::frb(sync)]
pub fn list_mark_done(list_id: String) -> ActionResponse {
    let result = parse_id("list_mark_done", &list_id).and_then(|id| {
        with_service("list_mark_done", |service| service.mark_list_done(id)).map(|n| (id, n))
    });
    match result {
        Ok((id, changed)) => {
            ActionResponse::success(format!("Marked {changed} task(s) done."), id)
        }
        Err(err) => ActionResponse::failure(err),
    }
}

/// Creates a task in a list and reports its row in the current section.
#[flutter_rust_bridge::frb(sync)]
pub fn task_create(list_id: String, name: String, note: String) -> ActionResponse {
    let result = parse_id("task_create", &list_id).and_then(|id| {
        with_service("task_create", |service| service.add_task(id, &name, &note))
    });
    match result {
        Ok(placement) => ActionResponse::placed(
            "Task created.",
            placement.task.id,
            Some(placement.section),
            placement.index,
        ),
        Err(err) => ActionResponse::failure(err),
    }
}

/// Replaces name and note; completion state is kept.
#[flutter_rust_bridge::frb(sync)]
pub fn task_edit(task_id: String, name: String, note: String) -> ActionResponse {
    run_action("task_edit", &task_id, "Task updated.", |service, id| {
        service.edit_task(id, &name, &note)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(task_id: String) -> ActionResponse {
    run_action("task_delete", &task_id, "Task deleted.", |service, id| {
        service.delete_task(id)
    })
}

/// Flips completion and reports the section/row the task moves to.
#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle(task_id: String) -> ActionResponse {
    let result = parse_id("task_toggle", &task_id)
        .and_then(|id| with_service("task_toggle", |service| service.toggle_task(id)));
    match result {
        Ok(placement) => {
            let message = if placement.task.is_complete {
                "Task completed."
            } else {
                "Task reopened."
            };
            ActionResponse::placed(
                message,
                placement.task.id,
                Some(placement.section),
                placement.index,
            )
        }
        Err(err) => ActionResponse::failure(err),
    }
}

type Service<'conn> = TaskListService<SqliteTaskListRepository<'conn>>;

#[derive(Debug)]
struct FfiError {
    code: &'static str,
    message: String,
}

impl FfiError {
    fn new(kind: ErrorKind, message: String) -> Self {
        Self {
            code: kind.code(),
            message,
        }
    }

    fn from_repo(operation: &str, err: RepoError) -> Self {
        Self::new(err.kind(), format!("{operation} failed: {err}"))
    }
}

fn configure_store_inner(db_path: &str, seed_example_data: bool) -> Result<(), String> {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return Err("db_path cannot be empty".to_string());
    }
    let requested = PathBuf::from(trimmed);
    let settings = STORE.get_or_init(|| StoreSettings {
        db_path: requested.clone(),
        seed_example_data,
    });
    if settings.db_path != requested {
        return Err(format!(
            "store already configured at `{}`; refusing to switch to `{}`",
            settings.db_path.display(),
            requested.display()
        ));
    }

    let conn = open_db(&requested).map_err(|err| format!("store open failed: {err}"))?;
    let repo = SqliteTaskListRepository::try_new(&conn)
        .map_err(|err| format!("store init failed: {err}"))?;
    if seed_example_data {
        seed_once(&TaskListService::new(repo))
            .map_err(|err| format!("example data seeding failed: {err}"))?;
    }
    Ok(())
}

fn store_settings() -> &'static StoreSettings {
    STORE.get_or_init(|| {
        let config = CoreConfig::from_env();
        StoreSettings {
            db_path: config.db_path,
            seed_example_data: config.seed_example_data,
        }
    })
}

fn seed_once<R: TaskListRepository>(service: &TaskListService<R>) -> RepoResult<()> {
    if EXAMPLES_SEEDED.get().is_some() {
        return Ok(());
    }
    service.seed_example_data()?;
    let _ = EXAMPLES_SEEDED.set(());
    Ok(())
}

fn with_service<T>(
    operation: &'static str,
    f: impl FnOnce(&Service<'_>) -> RepoResult<T>,
) -> Result<T, FfiError> {
    let settings = store_settings();
    let conn = open_db(&settings.db_path).map_err(|err| {
        warn!("event=store_open module=ffi status=error operation={operation}");
        FfiError::new(
            ErrorKind::Storage,
            format!("{operation} failed: store open failed: {err}"),
        )
    })?;
    let repo = SqliteTaskListRepository::try_new(&conn)
        .map_err(|err| FfiError::from_repo(operation, err))?;
    let service = TaskListService::new(repo);
    if settings.seed_example_data {
        seed_once(&service).map_err(|err| FfiError::from_repo(operation, err))?;
    }
    f(&service).map_err(|err| FfiError::from_repo(operation, err))
}

fn run_action(
    operation: &'static str,
    raw_id: &str,
    message: &str,
    f: impl FnOnce(&Service<'_>, Uuid) -> RepoResult<()>,
) -> ActionResponse {
    let result = parse_id(operation, raw_id)
        .and_then(|id| with_service(operation, |service| f(service, id)).map(|()| id));
    match result {
        Ok(id) => ActionResponse::success(message, id),
        Err(err) => ActionResponse::failure(err),
    }
}

// An id that does not parse cannot name a live entity.
fn parse_id(operation: &str, raw: &str) -> Result<Uuid, FfiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        FfiError::new(
            ErrorKind::NotFound,
            format!("{operation} failed: unknown id `{}`", raw.trim()),
        )
    })
}

fn parse_sort_mode(operation: &str, raw: &str) -> Result<SortMode, FfiError> {
    raw.parse::<SortMode>()
        .map_err(|err| FfiError::new(ErrorKind::Validation, format!("{operation} failed: {err}")))
}

fn to_list_row(summary: ListSummary) -> ListRow {
    let current_count = match summary.badge {
        Badge::AllDone => 0,
        Badge::Count(count) => to_position(count),
    };
    ListRow {
        list_id: summary.list.id.to_string(),
        name: summary.list.name,
        created_at: summary.list.created_at,
        badge: summary.badge.to_string(),
        all_done: summary.badge == Badge::AllDone,
        current_count,
    }
}

fn to_detail_response(detail: ListDetail) -> ListDetailResponse {
    let message = format!(
        "{} current, {} completed.",
        detail.partition.current.len(),
        detail.partition.completed.len()
    );
    ListDetailResponse {
        ok: true,
        list_id: Some(detail.id.to_string()),
        name: detail.name,
        badge: detail.badge.to_string(),
        current: detail.partition.current.into_iter().map(to_task_row).collect(),
        completed: detail
            .partition
            .completed
            .into_iter()
            .map(to_task_row)
            .collect(),
        error_code: None,
        message,
    }
}

fn to_task_row(task: Task) -> TaskRow {
    TaskRow {
        task_id: task.id.to_string(),
        name: task.name,
        note: task.note,
        is_complete: task.is_complete,
    }
}

fn section_label(section: TaskSection) -> &'static str {
    match section {
        TaskSection::Current => "current",
        TaskSection::Completed => "completed",
    }
}

fn to_position(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        configure_store, core_version, init_logging, list_create, list_delete, list_detail,
        list_mark_done, list_rename, lists_view, ping, task_create, task_delete, task_edit,
        task_toggle,
    };
    use std::path::PathBuf;
    use std::sync::OnceLock;
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEST_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

    fn use_test_store() -> PathBuf {
        let path = TEST_DB_PATH
            .get_or_init(|| {
                std::env::temp_dir().join(format!(
                    "tasklists_ffi_test_{}.sqlite3",
                    std::process::id()
                ))
            })
            .clone();
        let error = configure_store(path.display().to_string(), false);
        assert!(error.is_empty(), "{error}");
        path
    }

    fn unique_name(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn configure_store_pins_one_path() {
        let path = use_test_store();
        assert!(configure_store(format!("  {}  ", path.display()), false).is_empty());

        let other = std::env::temp_dir().join("tasklists_ffi_other.sqlite3");
        let error = configure_store(other.display().to_string(), false);
        assert!(error.contains("refusing to switch"));
        assert!(configure_store("   ".to_string(), false).contains("empty"));
    }

    #[test]
    fn list_create_reports_position_and_appears_in_view() {
        use_test_store();
        let name = unique_name("!first");
        let created = list_create(name.clone(), "by_name".to_string());
        assert!(created.ok, "{}", created.message);
        assert_eq!(created.position, Some(0));
        let list_id = created.id.expect("created list should return id");

        let view = lists_view("by_date".to_string());
        assert!(view.ok, "{}", view.message);
        assert_eq!(view.sort_mode, "by_date");
        let row = view
            .items
            .iter()
            .find(|row| row.list_id == list_id)
            .expect("created list should be listed");
        assert_eq!(row.name, name);
        assert_eq!(row.badge, "0");
        assert!(!row.all_done);

        assert!(list_delete(list_id).ok);
    }

    #[test]
    fn task_flow_moves_rows_between_sections() {
        use_test_store();
        let list = list_create(unique_name("groceries"), "by_date".to_string());
        let list_id = list.id.expect("list id");

        let milk = task_create(list_id.clone(), "Milk".to_string(), "2L".to_string());
        assert!(milk.ok, "{}", milk.message);
        assert_eq!(milk.section.as_deref(), Some("current"));
        assert_eq!(milk.position, Some(0));
        let eggs = task_create(list_id.clone(), "Eggs".to_string(), String::new());
        assert_eq!(eggs.position, Some(1));
        let milk_id = milk.id.expect("task id");

        let toggled = task_toggle(milk_id.clone());
        assert!(toggled.ok, "{}", toggled.message);
        assert_eq!(toggled.section.as_deref(), Some("completed"));
        assert_eq!(toggled.position, Some(0));

        let edited = task_edit(milk_id.clone(), "Oat milk".to_string(), String::new());
        assert!(edited.ok, "{}", edited.message);

        let detail = list_detail(list_id.clone());
        assert!(detail.ok, "{}", detail.message);
        assert_eq!(detail.badge, "1");
        assert_eq!(detail.current.len(), 1);
        assert_eq!(detail.completed[0].name, "Oat milk");
        assert!(detail.completed[0].is_complete);

        let done = list_mark_done(list_id.clone());
        assert!(done.ok);
        assert_eq!(done.message, "Marked 1 task(s) done.");
        assert_eq!(list_detail(list_id.clone()).badge, "✓");

        assert!(task_delete(milk_id.clone()).ok);
        assert!(list_delete(list_id.clone()).ok);
        assert_eq!(
            list_detail(list_id).error_code.as_deref(),
            Some("not_found")
        );
        assert_eq!(task_toggle(milk_id).error_code.as_deref(), Some("not_found"));
    }

    #[test]
    fn failures_carry_stable_error_codes() {
        use_test_store();
        let blank = list_create("   ".to_string(), "by_date".to_string());
        assert!(!blank.ok);
        assert_eq!(blank.error_code.as_deref(), Some("validation"));

        let view = lists_view("alphabetical".to_string());
        assert!(!view.ok);
        assert_eq!(view.error_code.as_deref(), Some("validation"));

        let malformed = list_rename("not-a-uuid".to_string(), "Name".to_string());
        assert_eq!(malformed.error_code.as_deref(), Some("not_found"));

        let list = list_create(unique_name("chores"), "by_date".to_string());
        let list_id = list.id.expect("list id");
        let blank_task = task_create(list_id.clone(), String::new(), String::new());
        assert_eq!(blank_task.error_code.as_deref(), Some("validation"));
        assert!(list_delete(list_id).ok);
    }
}
