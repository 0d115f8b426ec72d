//! Tasky - deterministic daily plans for a task-management agent

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tasky::cli::{self, Cli, Commands};
use tasky::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::var("TASKY_DEBUG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter("tasky=debug")
            .init();
    }

    let cli = Cli::parse();

    // Completion needs no config or store
    if let Commands::Completion { shell } = cli.command {
        generate(shell, &mut Cli::command(), "tasky", &mut std::io::stdout());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Task { command } => cli::task::run(&config, command).await,
        Commands::User { command } => cli::user::run(&config, command).await,
        Commands::Summary(args) => cli::summary::run(&config, args).await,
        Commands::Tool(args) => cli::tool::run(&config, args).await,
        Commands::Completion { .. } => unreachable!(),
    }
}
