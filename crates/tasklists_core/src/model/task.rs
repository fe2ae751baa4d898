//! Task domain model.
//!
//! # Responsibility
//! - Define the completable unit of work owned by one task list.
//! - Provide the shared name/identity validation used by every entity.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `list_id` is fixed at creation; there is no re-parenting path.
//! - `is_complete` starts as `false` and only changes through repository
//!   toggle/mark-done operations.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

use super::task_list::TaskListId;

/// Stable identifier of a task.
pub type TaskId = Uuid;

/// Validation failures for entity construction and persisted read-back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// List name is empty or whitespace-only.
    EmptyListName,
    /// Task name is empty or whitespace-only.
    EmptyTaskName,
    /// Identifier is the nil UUID.
    NilId,
    /// Task nested in a list points at a different owner.
    TaskOwnerMismatch { task_id: TaskId, list_id: TaskListId },
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyListName => write!(f, "list name must not be blank"),
            Self::EmptyTaskName => write!(f, "task name must not be blank"),
            Self::NilId => write!(f, "identifier must not be nil"),
            Self::TaskOwnerMismatch { task_id, list_id } => {
                write!(f, "task {task_id} is not owned by list {list_id}")
            }
        }
    }
}

impl Error for ModelValidationError {}

/// One task inside a task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Owning list.
    pub list_id: TaskListId,
    /// Storage insertion sequence; `0` until persisted.
    pub seq: i64,
    pub name: String,
    /// Free text, may be empty.
    pub note: String,
    pub is_complete: bool,
}

impl Task {
    /// Creates a new, not yet persisted task with a generated stable ID.
    ///
    /// The name is trimmed before validation; the note is kept verbatim.
    ///
    /// # Errors
    /// - `EmptyTaskName` when `name` is blank.
    /// - `NilId` when `list_id` is nil.
    pub fn new(
        list_id: TaskListId,
        name: &str,
        note: impl Into<String>,
    ) -> Result<Self, ModelValidationError> {
        let task = Self {
            id: Uuid::new_v4(),
            list_id,
            seq: 0,
            name: normalize_task_name(name)?,
            note: note.into(),
            is_complete: false,
        };
        task.validate()?;
        Ok(task)
    }

    /// Checks field-level invariants.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.id.is_nil() || self.list_id.is_nil() {
            return Err(ModelValidationError::NilId);
        }
        if self.name.trim().is_empty() {
            return Err(ModelValidationError::EmptyTaskName);
        }
        Ok(())
    }

    /// Returns whether the task belongs to the current (not completed) subset.
    pub fn is_current(&self) -> bool {
        !self.is_complete
    }
}

/// Trims a task name and rejects blank input.
pub fn normalize_task_name(name: &str) -> Result<String, ModelValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ModelValidationError::EmptyTaskName);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{normalize_task_name, ModelValidationError, Task};
    use uuid::Uuid;

    #[test]
    fn normalize_task_name_trims_and_rejects_blank() {
        assert_eq!(normalize_task_name("  Milk \n").unwrap(), "Milk");
        assert_eq!(
            normalize_task_name(" \t ").unwrap_err(),
            ModelValidationError::EmptyTaskName
        );
    }

    #[test]
    fn new_task_rejects_nil_owner() {
        let err = Task::new(Uuid::nil(), "Milk", "").unwrap_err();
        assert_eq!(err, ModelValidationError::NilId);
    }
}
