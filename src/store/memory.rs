//! In-memory store for tests and embedding

use chrono::{DateTime, Utc};

use super::error::{Result, StoreError};
use super::{check_task, TaskStore};
use crate::task::{Task, TaskId, TaskStatus};
use crate::user::{User, UserId};

/// Vec-backed store. Insertion order doubles as creation order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: Vec<User>,
    tasks: Vec<Task>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a task without the constraint backstop. Lets tests stage the
    /// malformed snapshots the plan boundary must survive.
    #[doc(hidden)]
    pub fn insert_task_unchecked(&mut self, task: Task) {
        self.tasks.push(task);
    }
}

impl TaskStore for MemoryStore {
    fn fetch_tasks(&self, user_id: UserId, as_of: DateTime<Utc>) -> Result<Vec<Task>> {
        self.get_user(user_id)?;
        let mut tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|t| {
                t.user_id == user_id
                    && t.status != TaskStatus::Archived
                    && t.created_at <= as_of
            })
            .cloned()
            .collect();
        tasks.sort_by_key(|t| (t.created_at, t.id));
        Ok(tasks)
    }

    fn get_task(&self, user_id: UserId, task_id: TaskId) -> Result<Task> {
        self.tasks
            .iter()
            .find(|t| t.id == task_id && t.user_id == user_id)
            .cloned()
            .ok_or(StoreError::TaskNotFound(task_id))
    }

    fn insert_task(&mut self, task: Task) -> Result<()> {
        self.get_user(task.user_id)?;
        check_task(&task)?;
        self.tasks.push(task);
        Ok(())
    }

    fn update_task(&mut self, task: Task) -> Result<()> {
        check_task(&task)?;
        let slot = self
            .tasks
            .iter_mut()
            .find(|t| t.id == task.id && t.user_id == task.user_id)
            .ok_or(StoreError::TaskNotFound(task.id))?;
        *slot = task;
        Ok(())
    }

    fn get_user(&self, user_id: UserId) -> Result<User> {
        self.users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or(StoreError::UserNotFound(user_id))
    }

    fn find_user_by_phone(&self, phone_number: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.phone_number == phone_number)
            .cloned())
    }

    fn upsert_user(&mut self, phone_number: &str, username: &str) -> Result<User> {
        if let Some(user) = self.find_user_by_phone(phone_number)? {
            return Ok(user);
        }
        let user = User::new(username, phone_number);
        self.users.push(user.clone());
        Ok(user)
    }

    fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.users.clone())
    }

    fn delete_user(&mut self, user_id: UserId) -> Result<()> {
        let before = self.users.len();
        self.users.retain(|u| u.id != user_id);
        if self.users.len() == before {
            return Err(StoreError::UserNotFound(user_id));
        }
        // Cascade: the only physical task deletion
        self.tasks.retain(|t| t.user_id != user_id);
        Ok(())
    }
}
