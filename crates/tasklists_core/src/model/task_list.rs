//! Task list domain model.
//!
//! # Responsibility
//! - Define the named container that exclusively owns its tasks.
//!
//! # Invariants
//! - `id` and `created_at` never change after creation.
//! - Every nested task has `list_id == id`.
//! - `tasks` is kept in storage order (`seq ASC`).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::task::{ModelValidationError, Task};

/// Stable identifier of a task list.
pub type TaskListId = Uuid;

/// Named container of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    pub id: TaskListId,
    /// Storage insertion sequence; `0` until persisted.
    pub seq: i64,
    pub name: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl TaskList {
    /// Creates a new, not yet persisted list with no tasks.
    ///
    /// # Errors
    /// - `EmptyListName` when `name` is blank after trimming.
    pub fn new(name: &str, created_at: i64) -> Result<Self, ModelValidationError> {
        Ok(Self {
            id: Uuid::new_v4(),
            seq: 0,
            name: normalize_list_name(name)?,
            created_at,
            tasks: Vec::new(),
        })
    }

    /// Checks list fields and ownership of every nested task.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.id.is_nil() {
            return Err(ModelValidationError::NilId);
        }
        if self.name.trim().is_empty() {
            return Err(ModelValidationError::EmptyListName);
        }
        for task in &self.tasks {
            task.validate()?;
            if task.list_id != self.id {
                return Err(ModelValidationError::TaskOwnerMismatch {
                    task_id: task.id,
                    list_id: self.id,
                });
            }
        }
        Ok(())
    }

    /// Looks up one owned task.
    pub fn task(&self, task_id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }
}

/// Trims a list name and rejects blank input.
pub fn normalize_list_name(name: &str) -> Result<String, ModelValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ModelValidationError::EmptyListName);
    }
    Ok(trimmed.to_string())
}
