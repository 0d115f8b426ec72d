//! Task data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::error::TaskError;
use crate::user::UserId;

/// Priority level assigned to new tasks when the caller gives none
pub const DEFAULT_PRIORITY: u8 = 2;

/// Unique task identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a task ID from its hyphenated string form
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started
    Pending,
    /// Being worked on
    InProgress,
    /// Finished
    Completed,
    /// Out of circulation; terminal
    Archived,
}

impl TaskStatus {
    /// Parse status from text
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "todo" => Some(Self::Pending),
            "in_progress" | "in-progress" | "active" => Some(Self::InProgress),
            "completed" | "done" => Some(Self::Completed),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }

    /// Get the text label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }

    /// Whether a change from `self` to `next` is allowed. Progress is
    /// monotonic (pending -> in_progress -> completed); archived is
    /// reachable from any state and terminal. Self-transitions are not
    /// in the table; callers treat an unchanged status as a no-op.
    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        use TaskStatus::*;
        matches!(
            (self, next),
            (Pending, InProgress)
                | (Pending, Completed)
                | (Pending, Archived)
                | (InProgress, Completed)
                | (InProgress, Archived)
                | (Completed, Archived)
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Validated priority view over the raw 1-3 level stored on a task.
/// 1 is highest, matching the storage schema's check constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

impl TaskPriority {
    /// Validate a raw level. `None` for anything outside 1..=3.
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::High),
            2 => Some(Self::Medium),
            3 => Some(Self::Low),
            _ => None,
        }
    }

    /// The raw 1-3 level
    pub fn level(&self) -> u8 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    /// Parse priority from text
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" | "1" => Some(Self::High),
            "medium" | "med" | "2" => Some(Self::Medium),
            "low" | "3" => Some(Self::Low),
            _ => None,
        }
    }

    /// Get the text label
    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A task
///
/// `priority` and `duration_mins` are stored raw rather than as validated
/// types: snapshots can arrive from storage the schema constraints did not
/// cover (hand-edited files, older writers), and the plan boundary rejects
/// bad records per task instead of failing the whole decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task ID
    pub id: TaskId,

    /// Owning user
    pub user_id: UserId,

    /// Task title
    pub title: String,

    /// Longer free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Current status
    pub status: TaskStatus,

    /// Deadline (if any)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_dt: Option<DateTime<Utc>>,

    /// When the work is scheduled to happen; independent of `due_dt`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dt: Option<DateTime<Utc>>,

    /// Estimated duration in minutes
    #[serde(default)]
    pub duration_mins: i64,

    /// Raw priority level, 1 = high .. 3 = low
    #[serde(default = "default_priority")]
    pub priority: u8,

    /// Free-text tags, insertion-ordered, no duplicates
    #[serde(default)]
    pub tags: Vec<String>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

fn default_priority() -> u8 {
    DEFAULT_PRIORITY
}

impl Task {
    /// Create a new pending task
    pub fn new(user_id: UserId, title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: TaskId::new(),
            user_id,
            title: title.into(),
            description: None,
            status: TaskStatus::Pending,
            due_dt: None,
            working_dt: None,
            duration_mins: 0,
            priority: DEFAULT_PRIORITY,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Check the invariants the storage schema also enforces
    pub fn validate(&self) -> Result<(), TaskError> {
        if TaskPriority::from_level(self.priority).is_none() {
            return Err(TaskError::InvalidInput(format!(
                "priority {} outside 1..=3",
                self.priority
            )));
        }
        if self.duration_mins < 0 {
            return Err(TaskError::InvalidInput(format!(
                "negative duration_mins {}",
                self.duration_mins
            )));
        }
        Ok(())
    }

    /// Apply a status change through the state machine
    pub fn transition_to(&mut self, next: TaskStatus, now: DateTime<Utc>) -> Result<(), TaskError> {
        if !self.status.can_transition_to(next) {
            return Err(TaskError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = now;
        Ok(())
    }

    /// Replace the tag set, keeping first-seen order and dropping duplicates
    pub fn set_tags(&mut self, tags: Vec<String>) {
        self.tags = dedup_tags(tags);
    }
}

/// Keep first-seen order, drop duplicates
pub fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter().filter(|t| seen.insert(t.clone())).collect()
}
