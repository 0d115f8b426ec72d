//! Task management CLI commands
//!
//! All mutations go through the tool dispatcher so the CLI and the agent
//! loop share one code path.

use anyhow::{bail, Result};
use chrono::Utc;
use clap::{Args, Subcommand};

use crate::agent::{
    CreateTaskInput, Dispatcher, TaskFilters, ToolCall, ToolOutcome, UpdateTaskInput,
};
use crate::config::Config;
use crate::store::TaskStore;
use crate::task::{TaskId, TaskPriority};

const TABLE_COL_TITLE: usize = 32;
const TABLE_COL_STATUS: usize = 12;
const TABLE_COL_DUE: usize = 17;

#[derive(Subcommand)]
pub enum TaskCommands {
    /// List tasks
    List(TaskListArgs),

    /// Add a new task
    Add(TaskAddArgs),

    /// Show task details
    Show(TaskShowArgs),

    /// Mark task as completed
    Done(TaskDoneArgs),

    /// Update task fields
    Update(TaskUpdateArgs),
}

#[derive(Args)]
pub struct TaskListArgs {
    /// User ID, phone number, or username
    #[arg(short, long)]
    user: String,

    /// Filter by status (pending, in_progress, completed)
    #[arg(short, long)]
    status: Option<String>,

    /// Filter by priority (1=high, 2=medium, 3=low)
    #[arg(short, long)]
    priority: Option<i64>,

    /// Filter by due date (YYYY-MM-DD)
    #[arg(long)]
    due: Option<String>,

    /// Filter by tag (repeatable)
    #[arg(long)]
    tag: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
pub struct TaskAddArgs {
    /// User ID, phone number, or username
    #[arg(short, long)]
    user: String,

    /// Task title
    title: String,

    /// Longer description
    #[arg(short, long)]
    description: Option<String>,

    /// Priority (high, medium, low or 1-3)
    #[arg(short, long, default_value = "medium")]
    priority: String,

    /// Due datetime (YYYY-MM-DD or "YYYY-MM-DD HH:MM:SS")
    #[arg(long)]
    due: Option<String>,

    /// Working datetime (YYYY-MM-DD or "YYYY-MM-DD HH:MM:SS")
    #[arg(long)]
    working: Option<String>,

    /// Estimated duration in minutes
    #[arg(long)]
    duration: Option<i64>,

    /// Tag (repeatable)
    #[arg(long)]
    tag: Vec<String>,
}

#[derive(Args)]
pub struct TaskShowArgs {
    /// User ID, phone number, or username
    #[arg(short, long)]
    user: String,

    /// Task ID
    id: String,
}

#[derive(Args)]
pub struct TaskDoneArgs {
    /// User ID, phone number, or username
    #[arg(short, long)]
    user: String,

    /// Task ID
    id: String,
}

#[derive(Args)]
pub struct TaskUpdateArgs {
    /// User ID, phone number, or username
    #[arg(short, long)]
    user: String,

    /// Task ID
    id: String,

    /// New title
    #[arg(long)]
    title: Option<String>,

    /// New status (pending, in_progress, completed, archived)
    #[arg(short, long)]
    status: Option<String>,

    /// New priority (high, medium, low or 1-3)
    #[arg(short, long)]
    priority: Option<String>,

    /// New due datetime
    #[arg(long)]
    due: Option<String>,

    /// New working datetime
    #[arg(long)]
    working: Option<String>,

    /// New estimated duration in minutes
    #[arg(long)]
    duration: Option<i64>,
}

pub async fn run(config: &Config, command: TaskCommands) -> Result<()> {
    match command {
        TaskCommands::List(args) => run_list(config, args).await,
        TaskCommands::Add(args) => run_add(config, args).await,
        TaskCommands::Show(args) => run_show(config, args).await,
        TaskCommands::Done(args) => run_done(config, args).await,
        TaskCommands::Update(args) => run_update(config, args).await,
    }
}

async fn run_list(config: &Config, args: TaskListArgs) -> Result<()> {
    let mut store = super::open_store(config)?;
    let user = super::resolve_user(&args.user, &store)?;

    let filters = TaskFilters {
        status: args.status,
        priority: args.priority,
        due_dt: args.due,
        working_dt: None,
        tags: if args.tag.is_empty() {
            None
        } else {
            Some(args.tag)
        },
    };

    let mut dispatcher = Dispatcher::new(config, &mut store);
    let outcome = dispatcher.dispatch(user.id, Utc::now(), ToolCall::ListTasks { filters })?;

    let ToolOutcome::ListTasks { tasks, count } = outcome else {
        bail!("unexpected tool outcome");
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("No tasks found for '{}'.", user.username);
        return Ok(());
    }

    let tz = config.utc_offset();
    println!(
        "{:<width_title$} {:<width_status$} {:<width_due$} PRI ID",
        "TITLE",
        "STATUS",
        "DUE",
        width_title = TABLE_COL_TITLE,
        width_status = TABLE_COL_STATUS,
        width_due = TABLE_COL_DUE
    );
    for task in &tasks {
        let due = task
            .due_dt
            .map(|d| d.with_timezone(&tz).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<width_title$} {:<width_status$} {:<width_due$} {:<3} {}",
            super::truncate(&task.title, TABLE_COL_TITLE),
            task.status.label(),
            due,
            task.priority,
            task.id,
            width_title = TABLE_COL_TITLE,
            width_status = TABLE_COL_STATUS,
            width_due = TABLE_COL_DUE
        );
    }
    println!("\n{} task(s)", count);
    Ok(())
}

async fn run_add(config: &Config, args: TaskAddArgs) -> Result<()> {
    let mut store = super::open_store(config)?;
    let user = super::resolve_user(&args.user, &store)?;

    let priority = TaskPriority::parse(&args.priority)
        .ok_or_else(|| anyhow::anyhow!("Invalid priority '{}'", args.priority))?;

    let input = CreateTaskInput {
        title: args.title,
        description: args.description,
        status: None,
        due_dt: args.due,
        working_dt: args.working,
        duration_mins: args.duration,
        priority: Some(i64::from(priority.level())),
        tags: if args.tag.is_empty() {
            None
        } else {
            Some(args.tag)
        },
    };

    let mut dispatcher = Dispatcher::new(config, &mut store);
    let outcome = dispatcher.dispatch(
        user.id,
        Utc::now(),
        ToolCall::CreateTasks {
            tasks: vec![input],
        },
    )?;

    let ToolOutcome::CreateTasks { created, failed } = outcome else {
        bail!("unexpected tool outcome");
    };
    if let Some(failure) = failed.first() {
        bail!("Failed to create task: {}", failure.reason);
    }
    println!("Created task {}", created[0]);
    Ok(())
}

async fn run_show(config: &Config, args: TaskShowArgs) -> Result<()> {
    let store = super::open_store(config)?;
    let user = super::resolve_user(&args.user, &store)?;
    let id = TaskId::parse(&args.id).ok_or_else(|| anyhow::anyhow!("Invalid task ID"))?;

    let task = store.get_task(user.id, id)?;
    let tz = config.utc_offset();

    println!("{}: {}", task.id, task.title);
    println!("  Status: {}", task.status.label());
    println!("  Priority: {}", task.priority);
    if let Some(description) = &task.description {
        println!("  Description: {}", description);
    }
    if let Some(due) = task.due_dt {
        println!("  Due: {}", due.with_timezone(&tz).format("%Y-%m-%d %H:%M"));
    }
    if let Some(working) = task.working_dt {
        println!(
            "  Working: {}",
            working.with_timezone(&tz).format("%Y-%m-%d %H:%M")
        );
    }
    if task.duration_mins > 0 {
        println!("  Duration: {} mins", task.duration_mins);
    }
    if !task.tags.is_empty() {
        println!("  Tags: {}", task.tags.join(", "));
    }
    println!(
        "  Created: {}",
        task.created_at.with_timezone(&tz).format("%Y-%m-%d %H:%M")
    );
    Ok(())
}

async fn run_done(config: &Config, args: TaskDoneArgs) -> Result<()> {
    update_one(
        config,
        &args.user,
        &args.id,
        UpdateFields {
            status: Some("completed".to_string()),
            ..UpdateFields::default()
        },
    )
    .await
}

async fn run_update(config: &Config, args: TaskUpdateArgs) -> Result<()> {
    let priority = match &args.priority {
        Some(p) => Some(
            TaskPriority::parse(p)
                .ok_or_else(|| anyhow::anyhow!("Invalid priority '{}'", p))?,
        ),
        None => None,
    };

    update_one(
        config,
        &args.user,
        &args.id,
        UpdateFields {
            title: args.title,
            status: args.status,
            priority: priority.map(|p| i64::from(p.level())),
            due_dt: args.due,
            working_dt: args.working,
            duration_mins: args.duration,
        },
    )
    .await
}

#[derive(Default)]
struct UpdateFields {
    title: Option<String>,
    status: Option<String>,
    priority: Option<i64>,
    due_dt: Option<String>,
    working_dt: Option<String>,
    duration_mins: Option<i64>,
}

async fn update_one(
    config: &Config,
    user_ref: &str,
    task_ref: &str,
    fields: UpdateFields,
) -> Result<()> {
    let mut store = super::open_store(config)?;
    let user = super::resolve_user(user_ref, &store)?;

    let input = UpdateTaskInput {
        task_id: task_ref.to_string(),
        title: fields.title,
        description: None,
        status: fields.status,
        due_dt: fields.due_dt,
        working_dt: fields.working_dt,
        duration_mins: fields.duration_mins,
        priority: fields.priority,
        tags: None,
    };

    let mut dispatcher = Dispatcher::new(config, &mut store);
    let outcome = dispatcher.dispatch(
        user.id,
        Utc::now(),
        ToolCall::UpdateTasks {
            tasks: vec![input],
        },
    )?;

    let ToolOutcome::UpdateTasks { updated, failed } = outcome else {
        bail!("unexpected tool outcome");
    };
    if let Some(failure) = failed.first() {
        bail!("Failed to update task: {}", failure.reason);
    }
    println!("Updated task {}", updated[0]);
    Ok(())
}
