//! Repository layer contracts and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract for task lists and tasks.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Write paths validate names before any SQL mutation.
//! - Unknown ids surface as `ListNotFound`/`TaskNotFound`, never as silent
//!   no-ops.

pub mod task_list_repo;
