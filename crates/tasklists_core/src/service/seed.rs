//! Example data for first launch.
//!
//! Seeding only runs against a store with no lists, so calling it on every
//! startup is safe.

use crate::repo::task_list_repo::{ListDraft, RepoResult, TaskDraft, TaskListRepository};

const EXAMPLE_LISTS: &[ListDraft<'static>] = &[
    ListDraft {
        name: "Shopping List",
        tasks: &[
            TaskDraft {
                name: "Milk",
                note: "2L",
                is_complete: false,
            },
            TaskDraft {
                name: "Bread",
                note: "",
                is_complete: false,
            },
            TaskDraft {
                name: "Apples",
                note: "2Kg",
                is_complete: true,
            },
        ],
    },
    ListDraft {
        name: "Movies List",
        tasks: &[
            TaskDraft {
                name: "Best film ever",
                note: "",
                is_complete: true,
            },
            TaskDraft {
                name: "The best of the best",
                note: "Must have",
                is_complete: true,
            },
        ],
    },
    ListDraft {
        name: "Weekend Chores",
        tasks: &[],
    },
];

/// Inserts the example lists when the store is empty.
///
/// Returns `false` without writing anything when at least one list exists.
/// The emptiness check and the inserts share one write transaction.
pub fn seed_example_data<R: TaskListRepository>(repo: &R) -> RepoResult<bool> {
    repo.create_lists_if_empty(EXAMPLE_LISTS)
}
