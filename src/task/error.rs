use thiserror::Error;

use super::model::TaskStatus;

#[derive(Debug, Error)]
pub enum TaskError {
    /// Task data violating an invariant the storage schema also enforces.
    /// At the plan boundary the offending task is excluded, not fatal.
    #[error("invalid task input: {0}")]
    InvalidInput(String),

    /// Rejected status change. Surfaced to the caller, never silently applied.
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition { from: TaskStatus, to: TaskStatus },
}

pub type Result<T> = std::result::Result<T, TaskError>;
