//! Task and user storage
//!
//! The plan engine never touches storage. Callers take a point-in-time
//! snapshot through [`TaskStore::fetch_tasks`] first, then hand the
//! snapshot to the planner; consistency during live chat sessions is the
//! store's job, not the planner's.

pub mod error;
pub mod json;
pub mod memory;

pub use error::{Result, StoreError};
pub use json::JsonStore;
pub use memory::MemoryStore;

use chrono::{DateTime, Utc};

use crate::task::{Task, TaskId};
use crate::user::{User, UserId};

/// Schema-level backstop applied on writes. Reads stay unchecked: the plan
/// boundary handles records that predate the constraints.
pub(crate) fn check_task(task: &Task) -> Result<()> {
    if task.title.trim().is_empty() {
        return Err(StoreError::Constraint("empty title".to_string()));
    }
    task.validate()
        .map_err(|err| StoreError::Constraint(err.to_string()))
}

/// Narrow storage interface the tool layer and summary service consume.
///
/// Tasks are never physically deleted through this interface; archiving is
/// the terminal state. The one exception is [`delete_user`], which removes
/// the user and cascades to every task they own.
///
/// [`delete_user`]: TaskStore::delete_user
pub trait TaskStore {
    /// Snapshot of a user's non-archived tasks created at or before
    /// `as_of`, ordered by creation time.
    fn fetch_tasks(&self, user_id: UserId, as_of: DateTime<Utc>) -> Result<Vec<Task>>;

    /// Fetch one task, checking ownership
    fn get_task(&self, user_id: UserId, task_id: TaskId) -> Result<Task>;

    fn insert_task(&mut self, task: Task) -> Result<()>;

    /// Replace a stored task with the given record, checking ownership
    fn update_task(&mut self, task: Task) -> Result<()>;

    fn get_user(&self, user_id: UserId) -> Result<User>;

    fn find_user_by_phone(&self, phone_number: &str) -> Result<Option<User>>;

    /// Find a user by phone number, creating one when absent
    fn upsert_user(&mut self, phone_number: &str, username: &str) -> Result<User>;

    fn list_users(&self) -> Result<Vec<User>>;

    /// Remove a user and, cascading, every task they own
    fn delete_user(&mut self, user_id: UserId) -> Result<()>;
}
