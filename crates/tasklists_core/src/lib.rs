//! Core data layer for task lists.
//! This crate is the single source of truth for task list invariants: the
//! UI layer calls into it and redraws from the projections it returns.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod projection;
pub mod repo;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::task::{ModelValidationError, Task, TaskId};
pub use model::task_list::{TaskList, TaskListId};
pub use projection::{
    list_badge, partition_tasks, sort_lists, Badge, SortMode, SortModeParseError, TaskPartition,
    TaskSection,
};
pub use repo::task_list_repo::{
    ErrorKind, ListDraft, RepoError, RepoResult, SqliteTaskListRepository, TaskDraft,
    TaskListRepository,
};
pub use service::seed::seed_example_data;
pub use service::task_list_service::{
    ListDetail, ListPlacement, ListSummary, TaskListService, TaskPlacement,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
