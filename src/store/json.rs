//! JSON file persistence
//!
//! One `users.json` and one `tasks.json` under the data directory, loaded
//! whole on open and rewritten on every mutation with a `.bak` copy of the
//! previous contents. Loaded records are not validated; the constraint
//! backstop applies to writes only, so a hand-edited file can still be
//! read and handled downstream.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use super::error::{Result, StoreError};
use super::{check_task, TaskStore};
use crate::task::{Task, TaskId, TaskStatus};
use crate::user::{User, UserId};

pub struct JsonStore {
    users_path: PathBuf,
    tasks_path: PathBuf,
    users: Vec<User>,
    tasks: Vec<Task>,
}

impl JsonStore {
    /// Open (or initialize) the store under `data_dir`
    pub fn open(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)?;
        let users_path = data_dir.join("users.json");
        let tasks_path = data_dir.join("tasks.json");

        let users = load_file(&users_path)?;
        let tasks = load_file(&tasks_path)?;

        Ok(Self {
            users_path,
            tasks_path,
            users,
            tasks,
        })
    }

    fn save_users(&self) -> Result<()> {
        save_file(&self.users_path, &self.users)
    }

    fn save_tasks(&self) -> Result<()> {
        save_file(&self.tasks_path, &self.tasks)
    }
}

fn load_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&content)?)
}

fn save_file<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    if path.exists() {
        let backup_path = path.with_extension("json.bak");
        if let Err(e) = fs::copy(path, &backup_path) {
            warn!("Failed to create backup: {}", e);
        }
    }
    let content = serde_json::to_string_pretty(items)?;
    fs::write(path, content)?;
    Ok(())
}

impl TaskStore for JsonStore {
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
        self.save_tasks()
    }

    fn update_task(&mut self, task: Task) -> Result<()> {
        check_task(&task)?;
        let slot = self
            .tasks
            .iter_mut()
            .find(|t| t.id == task.id && t.user_id == task.user_id)
            .ok_or(StoreError::TaskNotFound(task.id))?;
        *slot = task;
        self.save_tasks()
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
        self.save_users()?;
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
        self.save_users()?;
        self.save_tasks()
    }
}
