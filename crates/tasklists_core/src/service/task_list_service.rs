//! Task list use-case service.
//!
//! # Responsibility
//! - Provide the operations a UI calls to mutate lists and tasks.
//! - Re-run projections after inserts and toggles so callers learn where the
//!   affected row lands.
//!
//! # Invariants
//! - Service APIs never bypass repository validation or transactions.
//! - Placements are computed from a fresh read after the write; nothing is
//!   cached between calls.
//! - Diagnostics carry ids, counts and durations only, never names or notes.

use crate::model::task::{Task, TaskId};
use crate::model::task_list::{TaskList, TaskListId};
use crate::projection::partition::{partition_tasks, TaskPartition, TaskSection};
use crate::projection::sort::{position_of, sort_lists, SortMode};
use crate::projection::{list_badge, Badge};
use crate::repo::task_list_repo::{RepoError, RepoResult, TaskListRepository};
use crate::service::seed::seed_example_data;
use log::{info, warn};
use std::time::Instant;

/// A newly created list and its row in the requested ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPlacement {
    pub list: TaskList,
    pub index: usize,
}

/// A task and the section/row it is displayed at after re-partitioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPlacement {
    pub task: Task,
    pub section: TaskSection,
    pub index: usize,
}

/// One row of the lists screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSummary {
    pub list: TaskList,
    pub badge: Badge,
}

/// Everything the tasks screen of one list needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDetail {
    pub id: TaskListId,
    pub name: String,
    pub created_at: i64,
    pub badge: Badge,
    pub partition: TaskPartition,
}

/// Use-case service over a task list repository.
pub struct TaskListService<R: TaskListRepository> {
    repo: R,
}

impl<R: TaskListRepository> TaskListService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Underlying repository, for read accessors such as `get_task`.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Lists in the requested order, each with its badge.
    pub fn lists_overview(&self, mode: SortMode) -> RepoResult<Vec<ListSummary>> {
        let lists = sort_lists(self.repo.all_lists()?, mode);
        Ok(lists
            .into_iter()
            .map(|list| {
                let badge = list_badge(&list);
                ListSummary { list, badge }
            })
            .collect())
    }

    /// Partitioned tasks of one list.
    pub fn list_detail(&self, id: TaskListId) -> RepoResult<ListDetail> {
        let list = self.repo.get_list(id)?;
        Ok(ListDetail {
            id: list.id,
            badge: list_badge(&list),
            partition: partition_tasks(&list),
            name: list.name,
            created_at: list.created_at,
        })
    }

    /// Creates a list and reports its row under `mode`.
    pub fn add_list(&self, name: &str, mode: SortMode) -> RepoResult<ListPlacement> {
        let started_at = Instant::now();
        observe("list_create", started_at, self.insert_and_place_list(name, mode))
    }

    pub fn rename_list(&self, id: TaskListId, new_name: &str) -> RepoResult<()> {
        let started_at = Instant::now();
        observe("list_rename", started_at, self.repo.rename_list(id, new_name))
    }

    /// Deletes a list together with all of its tasks.
    pub fn delete_list(&self, id: TaskListId) -> RepoResult<()> {
        let started_at = Instant::now();
        observe("list_delete", started_at, self.repo.delete_list(id))
    }

    /// Completes every current task of a list. Repeat calls change nothing.
    pub fn mark_list_done(&self, id: TaskListId) -> RepoResult<usize> {
        let started_at = Instant::now();
        let result = self.repo.mark_list_done(id);
        if let Ok(changed) = &result {
            info!("event=list_mark_done module=service list_id={id} changed={changed}");
        }
        observe("list_mark_done", started_at, result)
    }

    /// Creates a task and reports its row in the current section.
    pub fn add_task(
        &self,
        list_id: TaskListId,
        name: &str,
        note: &str,
    ) -> RepoResult<TaskPlacement> {
        let started_at = Instant::now();
        let result = self
            .repo
            .create_task(list_id, name, note)
            .and_then(|task| self.place_task(task.list_id, task.id));
        observe("task_create", started_at, result)
    }

    /// Replaces name and note. Completion state is untouched.
    pub fn edit_task(&self, id: TaskId, new_name: &str, new_note: &str) -> RepoResult<()> {
        let started_at = Instant::now();
        observe(
            "task_edit",
            started_at,
            self.repo.edit_task(id, new_name, new_note),
        )
    }

    pub fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let started_at = Instant::now();
        observe("task_delete", started_at, self.repo.delete_task(id))
    }

    /// Flips completion state and reports where the task now displays.
    pub fn toggle_task(&self, id: TaskId) -> RepoResult<TaskPlacement> {
        let started_at = Instant::now();
        observe("task_toggle", started_at, self.toggle_and_place_task(id))
    }

    /// Seeds example lists into an empty store. Returns whether it seeded.
    pub fn seed_example_data(&self) -> RepoResult<bool> {
        let started_at = Instant::now();
        observe("seed_examples", started_at, seed_example_data(&self.repo))
    }

    fn insert_and_place_list(&self, name: &str, mode: SortMode) -> RepoResult<ListPlacement> {
        let list = self.repo.create_list(name)?;
        let ordered = sort_lists(self.repo.all_lists()?, mode);
        let index = position_of(&ordered, list.id).ok_or_else(|| {
            inconsistent(format!("created list {} missing from read-back", list.id))
        })?;
        Ok(ListPlacement { list, index })
    }

    fn toggle_and_place_task(&self, id: TaskId) -> RepoResult<TaskPlacement> {
        self.repo.toggle_task_complete(id)?;
        let task = self.repo.get_task(id)?;
        self.place_task(task.list_id, id)
    }

    fn place_task(&self, list_id: TaskListId, task_id: TaskId) -> RepoResult<TaskPlacement> {
        let list = self.repo.get_list(list_id)?;
        let partition = partition_tasks(&list);
        let (section, index) = partition
            .locate(task_id)
            .ok_or_else(|| inconsistent(format!("task {task_id} missing from list {list_id}")))?;
        let task = partition.section(section)[index].clone();
        Ok(TaskPlacement {
            task,
            section,
            index,
        })
    }
}

fn inconsistent(details: String) -> RepoError {
    RepoError::InvalidData(format!("inconsistent read-back: {details}"))
}

fn observe<T>(event: &'static str, started_at: Instant, result: RepoResult<T>) -> RepoResult<T> {
    let duration_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => info!("event={event} module=service status=ok duration_ms={duration_ms}"),
        Err(err) => warn!(
            "event={event} module=service status=error duration_ms={duration_ms} error_code={}",
            err.kind().code()
        ),
    }
    result
}
