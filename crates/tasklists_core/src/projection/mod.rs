//! Derived view state over repository snapshots.
//!
//! # Responsibility
//! - Split a list's tasks into current and completed subsets.
//! - Order lists by creation date or by name.
//! - Summarize a list's progress as a badge.
//!
//! # Invariants
//! - Every function is pure and recomputed on demand; nothing is cached
//!   across mutations.
//! - Projections never reorder tasks inside a subset; storage order wins.

pub mod badge;
pub mod partition;
pub mod sort;

pub use badge::{list_badge, Badge};
pub use partition::{partition_tasks, TaskPartition, TaskSection};
pub use sort::{sort_lists, SortMode, SortModeParseError};
