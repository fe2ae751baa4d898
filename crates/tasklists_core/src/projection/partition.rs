//! Current/completed split of one list.

use crate::model::task::{Task, TaskId};
use crate::model::task_list::TaskList;
use serde::{Deserialize, Serialize};

/// Which subset a task is displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskSection {
    /// `is_complete == false`.
    Current,
    /// `is_complete == true`.
    Completed,
}

impl TaskSection {
    /// Section a task with the given completion state belongs to.
    pub fn of(is_complete: bool) -> Self {
        if is_complete {
            Self::Completed
        } else {
            Self::Current
        }
    }
}

/// Disjoint, covering split of a list's tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPartition {
    pub current: Vec<Task>,
    pub completed: Vec<Task>,
}

impl TaskPartition {
    /// Tasks of one section.
    pub fn section(&self, section: TaskSection) -> &[Task] {
        match section {
            TaskSection::Current => &self.current,
            TaskSection::Completed => &self.completed,
        }
    }

    /// Finds the section and row index of a task.
    pub fn locate(&self, task_id: TaskId) -> Option<(TaskSection, usize)> {
        [TaskSection::Current, TaskSection::Completed]
            .into_iter()
            .find_map(|section| {
                self.section(section)
                    .iter()
                    .position(|task| task.id == task_id)
                    .map(|index| (section, index))
            })
    }

    /// Total number of tasks across both sections.
    pub fn len(&self) -> usize {
        self.current.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Splits `list.tasks` by completion state, keeping storage order in each
/// subset.
pub fn partition_tasks(list: &TaskList) -> TaskPartition {
    let (completed, current): (Vec<Task>, Vec<Task>) = list
        .tasks
        .iter()
        .cloned()
        .partition(|task| task.is_complete);
    TaskPartition { current, completed }
}

#[cfg(test)]
mod tests {
    use super::{partition_tasks, TaskSection};
    use crate::model::task::Task;
    use crate::model::task_list::TaskList;

    fn list_with(states: &[(&str, bool)]) -> TaskList {
        let mut list = TaskList::new("Groceries", 0).unwrap();
        for (seq, (name, done)) in states.iter().enumerate() {
            let mut task = Task::new(list.id, name, "").unwrap();
            task.seq = seq as i64 + 1;
            task.is_complete = *done;
            list.tasks.push(task);
        }
        list
    }

    fn names(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|task| task.name.as_str()).collect()
    }

    #[test]
    fn empty_list_yields_two_empty_subsets() {
        let partition = partition_tasks(&list_with(&[]));
        assert!(partition.is_empty());
        assert!(partition.current.is_empty());
        assert!(partition.completed.is_empty());
    }

    #[test]
    fn subsets_keep_storage_order() {
        let list = list_with(&[("a", false), ("b", true), ("c", false), ("d", true)]);
        let partition = partition_tasks(&list);
        assert_eq!(names(&partition.current), ["a", "c"]);
        assert_eq!(names(&partition.completed), ["b", "d"]);
    }

    #[test]
    fn subsets_are_disjoint_and_cover_the_list() {
        let list = list_with(&[("a", true), ("b", false), ("c", true)]);
        let partition = partition_tasks(&list);
        assert_eq!(partition.len(), list.tasks.len());
        for task in &list.tasks {
            let in_current = partition.current.contains(task);
            let in_completed = partition.completed.contains(task);
            assert!(in_current ^ in_completed, "{} must be in exactly one subset", task.name);
        }
    }

    #[test]
    fn locate_reports_section_and_row() {
        let list = list_with(&[("a", false), ("b", true), ("c", false)]);
        let partition = partition_tasks(&list);
        assert_eq!(
            partition.locate(list.tasks[2].id),
            Some((TaskSection::Current, 1))
        );
        assert_eq!(
            partition.locate(list.tasks[1].id),
            Some((TaskSection::Completed, 0))
        );
        assert_eq!(partition.locate(uuid::Uuid::new_v4()), None);
    }

    #[test]
    fn section_of_maps_completion_flag() {
        assert_eq!(TaskSection::of(false), TaskSection::Current);
        assert_eq!(TaskSection::of(true), TaskSection::Completed);
    }
}
