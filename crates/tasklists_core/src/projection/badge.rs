//! Per-list progress summary.

use crate::model::task_list::TaskList;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Display summary of a list's current partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    /// At least one task and none of them current.
    AllDone,
    /// Number of current tasks. `Count(0)` means the list has no tasks yet.
    Count(usize),
}

impl Display for Badge {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AllDone => write!(f, "✓"),
            Self::Count(count) => write!(f, "{count}"),
        }
    }
}

/// Computes the badge for one list.
pub fn list_badge(list: &TaskList) -> Badge {
    let current = list.tasks.iter().filter(|task| task.is_current()).count();
    if current == 0 && !list.tasks.is_empty() {
        Badge::AllDone
    } else {
        Badge::Count(current)
    }
}
