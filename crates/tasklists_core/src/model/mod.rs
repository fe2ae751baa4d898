//! Domain model for task lists and their tasks.
//!
//! # Responsibility
//! - Define the canonical records shared by repository and projections.
//! - Validate names and identities at construction and on read-back.
//!
//! # Invariants
//! - Every task belongs to exactly one list for its whole lifetime.
//! - Identifiers are UUID v4 and are never reused after deletion.

pub mod task;
pub mod task_list;
