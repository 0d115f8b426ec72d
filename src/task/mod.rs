//! Task domain model
//!
//! This module provides the typed task record and its status state machine
//! (pending -> in_progress -> completed, archived reachable from anywhere).
//! Transitions are driven by tool calls; the plan engine only reads.

pub mod error;
pub mod model;

pub use error::TaskError;
pub use model::{dedup_tags, Task, TaskId, TaskPriority, TaskStatus, DEFAULT_PRIORITY};
