use thiserror::Error;

use crate::task::TaskId;
use crate::user::UserId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// Write rejected by a schema-level invariant (priority range,
    /// duration sign, empty title). Mirrors the relational schema's
    /// check constraints.
    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
