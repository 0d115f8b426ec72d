//! Tool call execution

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use super::tool::{
    parse_date_filter, parse_tool_datetime, CreateTaskInput, ItemFailure, TaskFilters, ToolCall,
    ToolOutcome, UpdateTaskInput,
};
use crate::config::Config;
use crate::plan::{build_daily_plan, PlanWindow};
use crate::store::{StoreError, TaskStore};
use crate::summary::render_plan;
use crate::task::{Task, TaskId, TaskStatus};
use crate::user::UserId;

/// Executes tool calls for one user against the store.
///
/// Item-level problems (bad input, rejected transition, missing task) are
/// reported per item in the outcome and never abort siblings; only store
/// infrastructure failures propagate as errors.
pub struct Dispatcher<'a> {
    config: &'a Config,
    store: &'a mut dyn TaskStore,
}

impl<'a> Dispatcher<'a> {
    pub fn new(config: &'a Config, store: &'a mut dyn TaskStore) -> Self {
        Self { config, store }
    }

    pub fn dispatch(
        &mut self,
        user_id: UserId,
        now: DateTime<Utc>,
        call: ToolCall,
    ) -> Result<ToolOutcome, StoreError> {
        match call {
            ToolCall::CreateTasks { tasks } => self.create_tasks(user_id, now, tasks),
            ToolCall::UpdateTasks { tasks } => self.update_tasks(user_id, now, tasks),
            ToolCall::ListTasks { filters } => self.list_tasks(user_id, now, filters),
            ToolCall::Summarize {
                date,
                lookback_days,
                lookahead_days,
            } => self.summarize(user_id, now, date, lookback_days, lookahead_days),
        }
    }

    fn create_tasks(
        &mut self,
        user_id: UserId,
        now: DateTime<Utc>,
        inputs: Vec<CreateTaskInput>,
    ) -> Result<ToolOutcome, StoreError> {
        let mut created = Vec::new();
        let mut failed = Vec::new();

        for (index, input) in inputs.into_iter().enumerate() {
            match self.build_task(user_id, now, &input) {
                Ok(task) => {
                    let task_id = task.id;
                    match self.store.insert_task(task) {
                        Ok(()) => created.push(task_id),
                        Err(StoreError::Constraint(reason)) => failed.push(ItemFailure {
                            index,
                            task_id: None,
                            reason,
                        }),
                        Err(other) => return Err(other),
                    }
                }
                Err(reason) => failed.push(ItemFailure {
                    index,
                    task_id: None,
                    reason,
                }),
            }
        }

        info!(
            user_id = %user_id,
            created = created.len(),
            failed = failed.len(),
            "create_tasks"
        );
        Ok(ToolOutcome::CreateTasks { created, failed })
    }

    fn build_task(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
        input: &CreateTaskInput,
    ) -> Result<Task, String> {
        let tz = self.config.utc_offset();

        if input.title.trim().is_empty() {
            return Err("title must not be empty".to_string());
        }

        let mut task = Task::new(user_id, input.title.trim(), now);
        task.description = input.description.clone();

        if let Some(status) = &input.status {
            task.status = TaskStatus::parse(status)
                .ok_or_else(|| format!("invalid status '{}'", status))?;
        }
        if let Some(due) = &input.due_dt {
            task.due_dt = Some(parse_tool_datetime(due, tz)?);
        }
        if let Some(working) = &input.working_dt {
            task.working_dt = Some(parse_tool_datetime(working, tz)?);
        }
        if let Some(duration) = input.duration_mins {
            if duration < 0 {
                return Err(format!("negative duration_mins {}", duration));
            }
            task.duration_mins = duration;
        }
        if let Some(priority) = input.priority {
            task.priority = check_priority(priority)?;
        }
        if let Some(tags) = &input.tags {
            task.set_tags(tags.clone());
        }
        Ok(task)
    }

    fn update_tasks(
        &mut self,
        user_id: UserId,
        now: DateTime<Utc>,
        inputs: Vec<UpdateTaskInput>,
    ) -> Result<ToolOutcome, StoreError> {
        let mut updated = Vec::new();
        let mut failed = Vec::new();

        for (index, input) in inputs.into_iter().enumerate() {
            let Some(task_id) = TaskId::parse(&input.task_id) else {
                failed.push(ItemFailure {
                    index,
                    task_id: None,
                    reason: format!("invalid task ID '{}'", input.task_id),
                });
                continue;
            };

            let task = match self.store.get_task(user_id, task_id) {
                Ok(task) => task,
                Err(StoreError::TaskNotFound(_)) => {
                    failed.push(ItemFailure {
                        index,
                        task_id: Some(task_id),
                        reason: "task not found or not owned by user".to_string(),
                    });
                    continue;
                }
                Err(other) => return Err(other),
            };

            match self.apply_update(task, now, &input) {
                Ok(task) => match self.store.update_task(task) {
                    Ok(()) => updated.push(task_id),
                    Err(StoreError::Constraint(reason)) => failed.push(ItemFailure {
                        index,
                        task_id: Some(task_id),
                        reason,
                    }),
                    Err(other) => return Err(other),
                },
                Err(reason) => failed.push(ItemFailure {
                    index,
                    task_id: Some(task_id),
                    reason,
                }),
            }
        }

        info!(
            user_id = %user_id,
            updated = updated.len(),
            failed = failed.len(),
            "update_tasks"
        );
        Ok(ToolOutcome::UpdateTasks { updated, failed })
    }

    fn apply_update(
        &self,
        mut task: Task,
        now: DateTime<Utc>,
        input: &UpdateTaskInput,
    ) -> Result<Task, String> {
        let tz = self.config.utc_offset();

        if let Some(status) = &input.status {
            let next = TaskStatus::parse(status)
                .ok_or_else(|| format!("invalid status '{}'", status))?;
            // Unchanged status is a no-op, not a self-transition
            if next != task.status {
                task.transition_to(next, now).map_err(|e| e.to_string())?;
            }
        }
        if let Some(title) = &input.title {
            if title.trim().is_empty() {
                return Err("title must not be empty".to_string());
            }
            task.title = title.trim().to_string();
        }
        if let Some(description) = &input.description {
            task.description = Some(description.clone());
        }
        if let Some(due) = &input.due_dt {
            task.due_dt = Some(parse_tool_datetime(due, tz)?);
        }
        if let Some(working) = &input.working_dt {
            task.working_dt = Some(parse_tool_datetime(working, tz)?);
        }
        if let Some(duration) = input.duration_mins {
            if duration < 0 {
                return Err(format!("negative duration_mins {}", duration));
            }
            task.duration_mins = duration;
        }
        if let Some(priority) = input.priority {
            task.priority = check_priority(priority)?;
        }
        if let Some(tags) = &input.tags {
            task.set_tags(tags.clone());
        }
        task.updated_at = now;
        Ok(task)
    }

    fn list_tasks(
        &mut self,
        user_id: UserId,
        now: DateTime<Utc>,
        filters: TaskFilters,
    ) -> Result<ToolOutcome, StoreError> {
        let tz = self.config.utc_offset();
        let mut tasks = self.store.fetch_tasks(user_id, now)?;

        if let Some(status) = &filters.status {
            let wanted = TaskStatus::parse(status)
                .ok_or_else(|| StoreError::Constraint(format!("invalid status '{}'", status)))?;
            tasks.retain(|t| t.status == wanted);
        }
        if let Some(priority) = filters.priority {
            tasks.retain(|t| i64::from(t.priority) == priority);
        }
        if let Some(due) = &filters.due_dt {
            let filter = parse_date_filter(due, tz).map_err(StoreError::Constraint)?;
            tasks.retain(|t| filter.matches(t.due_dt, tz));
        }
        if let Some(working) = &filters.working_dt {
            let filter = parse_date_filter(working, tz).map_err(StoreError::Constraint)?;
            tasks.retain(|t| filter.matches(t.working_dt, tz));
        }
        if let Some(tags) = &filters.tags {
            tasks.retain(|t| tags.iter().all(|tag| t.tags.contains(tag)));
        }

        let count = tasks.len();
        Ok(ToolOutcome::ListTasks { tasks, count })
    }

    fn summarize(
        &mut self,
        user_id: UserId,
        now: DateTime<Utc>,
        date: Option<NaiveDate>,
        lookback_days: Option<u32>,
        lookahead_days: Option<u32>,
    ) -> Result<ToolOutcome, StoreError> {
        let tz = self.config.utc_offset();
        let user = self.store.get_user(user_id)?;
        let tasks = self.store.fetch_tasks(user_id, now)?;

        let window = PlanWindow {
            target: date,
            lookback_days: lookback_days.unwrap_or(self.config.summary.lookback_days),
            lookahead_days: lookahead_days.unwrap_or(self.config.summary.lookahead_days),
        };
        let plan = build_daily_plan(now, tz, tasks, window);
        let message = render_plan(&user.username, &plan, tz);

        Ok(ToolOutcome::Summarize { message, plan })
    }
}

fn check_priority(priority: i64) -> Result<u8, String> {
    if !(1..=3).contains(&priority) {
        return Err(format!("priority {} outside 1..=3", priority));
    }
    Ok(priority as u8)
}
