//! Flutter-facing bindings for the task list core.
//!
//! Only `api` is exported to Dart; bridge glue is generated from it.

pub mod api;
