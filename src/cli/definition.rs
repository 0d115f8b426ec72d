//! Top-level CLI definition

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use super::{summary, task, tool, user};

#[derive(Parser)]
#[command(
    name = "tasky",
    about = "Deterministic daily plans over a task store",
    version
)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true, env = "TASKY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage tasks
    Task {
        #[command(subcommand)]
        command: task::TaskCommands,
    },

    /// Manage users
    User {
        #[command(subcommand)]
        command: user::UserCommands,
    },

    /// Compute and deliver daily summaries
    Summary(summary::SummaryArgs),

    /// Dispatch a raw JSON tool call (the agent-loop entry point)
    Tool(tool::ToolArgs),

    /// Generate shell completions
    Completion { shell: Shell },
}
