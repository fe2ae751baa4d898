//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the operations a UI invokes.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod seed;
pub mod task_list_service;
