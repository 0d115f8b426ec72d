//! Tool call and outcome types

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::plan::DailyPlan;
use crate::task::{Task, TaskId};

/// The closed capability set exposed to the agent loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum ToolCall {
    /// Insert one or more tasks for the user
    CreateTasks { tasks: Vec<CreateTaskInput> },

    /// Update existing tasks by ID
    UpdateTasks { tasks: Vec<UpdateTaskInput> },

    /// List the user's tasks, optionally filtered
    ListTasks {
        #[serde(default)]
        filters: TaskFilters,
    },

    /// Compute the daily plan and its rendered summary
    Summarize {
        /// Target day; defaults to today in the user's timezone
        #[serde(default)]
        date: Option<NaiveDate>,
        #[serde(default)]
        lookback_days: Option<u32>,
        #[serde(default)]
        lookahead_days: Option<u32>,
    },
}

/// Fields for a task to create. Datetimes are strings in `YYYY-MM-DD` or
/// `YYYY-MM-DD HH:MM:SS` form, read in the user's timezone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateTaskInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// pending, in_progress, completed or archived; defaults to pending
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub due_dt: Option<String>,
    #[serde(default)]
    pub working_dt: Option<String>,
    #[serde(default)]
    pub duration_mins: Option<i64>,
    /// 1 = high .. 3 = low; defaults to 2
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Partial update for one task. Absent fields are left unchanged; a status
/// change goes through the state machine and a rejected transition fails
/// this item only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateTaskInput {
    pub task_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub due_dt: Option<String>,
    #[serde(default)]
    pub working_dt: Option<String>,
    #[serde(default)]
    pub duration_mins: Option<i64>,
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Conjunctive task filters for `list_tasks`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskFilters {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<i64>,
    /// Date (matches the whole local day) or exact datetime
    #[serde(default)]
    pub due_dt: Option<String>,
    #[serde(default)]
    pub working_dt: Option<String>,
    /// Every listed tag must be present
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Result of dispatching one tool call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum ToolOutcome {
    CreateTasks {
        created: Vec<TaskId>,
        failed: Vec<ItemFailure>,
    },
    UpdateTasks {
        updated: Vec<TaskId>,
        failed: Vec<ItemFailure>,
    },
    ListTasks {
        tasks: Vec<Task>,
        count: usize,
    },
    Summarize {
        message: String,
        plan: DailyPlan,
    },
}

/// One failed item in a batch tool call. Siblings are unaffected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemFailure {
    /// Position in the request batch
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
    pub reason: String,
}

/// A parsed datetime filter: a whole local day, or an exact instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum DateFilter {
    Day(NaiveDate),
    Instant(DateTime<Utc>),
}

impl DateFilter {
    pub(crate) fn matches(&self, dt: Option<DateTime<Utc>>, tz: FixedOffset) -> bool {
        match (self, dt) {
            (DateFilter::Day(day), Some(t)) => t.with_timezone(&tz).date_naive() == *day,
            (DateFilter::Instant(at), Some(t)) => t == *at,
            (_, None) => false,
        }
    }
}

/// Parse `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS` into UTC, reading the
/// value in the given offset. Date-only input maps to local midnight.
pub(crate) fn parse_tool_datetime(s: &str, tz: FixedOffset) -> Result<DateTime<Utc>, String> {
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M:%S") {
        return local_to_utc(ndt, tz);
    }
    if let Ok(day) = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
        return local_to_utc(day.and_time(NaiveTime::MIN), tz);
    }
    Err(format!(
        "invalid datetime '{}': use YYYY-MM-DD or YYYY-MM-DD HH:MM:SS",
        s
    ))
}

/// Parse a filter value, keeping date-only inputs as whole-day matches
pub(crate) fn parse_date_filter(s: &str, tz: FixedOffset) -> Result<DateFilter, String> {
    if let Ok(day) = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
        return Ok(DateFilter::Day(day));
    }
    parse_tool_datetime(s, tz).map(DateFilter::Instant)
}

fn local_to_utc(ndt: NaiveDateTime, tz: FixedOffset) -> Result<DateTime<Utc>, String> {
    tz.from_local_datetime(&ndt)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| format!("ambiguous local datetime '{}'", ndt))
}
