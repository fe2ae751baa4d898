//! List orderings.

use crate::model::task_list::{TaskList, TaskListId};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Supported total orderings of lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// `created_at` ascending, ties by insertion sequence.
    #[default]
    ByDate,
    /// Case-sensitive code-point order of `name`, ties by insertion sequence.
    ByName,
}

impl SortMode {
    /// Maps a two-state selector position: `0` is by date, anything else by
    /// name.
    pub fn from_selector_index(index: usize) -> Self {
        if index == 0 {
            Self::ByDate
        } else {
            Self::ByName
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ByDate => "by_date",
            Self::ByName => "by_name",
        }
    }
}

/// Unknown sort mode spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortModeParseError(pub String);

impl Display for SortModeParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported sort mode `{}`; expected by_date|by_name",
            self.0
        )
    }
}

impl Error for SortModeParseError {}

impl FromStr for SortMode {
    type Err = SortModeParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "by_date" | "date" => Ok(Self::ByDate),
            "by_name" | "name" => Ok(Self::ByName),
            other => Err(SortModeParseError(other.to_string())),
        }
    }
}

/// Returns `lists` in the requested order.
///
/// The result is a pure function of the input snapshot: sorting the same
/// snapshot twice yields identical sequences.
pub fn sort_lists(mut lists: Vec<TaskList>, mode: SortMode) -> Vec<TaskList> {
    match mode {
        SortMode::ByDate => lists.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.seq.cmp(&b.seq))
        }),
        SortMode::ByName => {
            lists.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.seq.cmp(&b.seq)))
        }
    }
    lists
}

/// Row index of a list inside an already ordered sequence.
pub fn position_of(lists: &[TaskList], id: TaskListId) -> Option<usize> {
    lists.iter().position(|list| list.id == id)
}
