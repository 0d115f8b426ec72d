//! User management CLI commands

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::config::Config;
use crate::store::TaskStore;

#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a user (no-op if the phone number is already known)
    Add(UserAddArgs),

    /// List users
    List(UserListArgs),

    /// Remove a user and every task they own
    Remove(UserRemoveArgs),
}

#[derive(Args)]
pub struct UserAddArgs {
    /// Display name
    username: String,

    /// Phone number the transport delivers to
    phone_number: String,
}

#[derive(Args)]
pub struct UserListArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
pub struct UserRemoveArgs {
    /// User ID, phone number, or username
    user: String,
}

pub async fn run(config: &Config, command: UserCommands) -> Result<()> {
    match command {
        UserCommands::Add(args) => run_add(config, args).await,
        UserCommands::List(args) => run_list(config, args).await,
        UserCommands::Remove(args) => run_remove(config, args).await,
    }
}

async fn run_add(config: &Config, args: UserAddArgs) -> Result<()> {
    let mut store = super::open_store(config)?;
    let user = store.upsert_user(&args.phone_number, &args.username)?;
    println!("User {} ({})", user.username, user.id);
    Ok(())
}

async fn run_list(config: &Config, args: UserListArgs) -> Result<()> {
    let store = super::open_store(config)?;
    let users = store.list_users()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&users)?);
        return Ok(());
    }

    if users.is_empty() {
        println!("No users registered.");
        return Ok(());
    }
    for user in users {
        println!("{:<20} {:<18} {}", user.username, user.phone_number, user.id);
    }
    Ok(())
}

async fn run_remove(config: &Config, args: UserRemoveArgs) -> Result<()> {
    let mut store = super::open_store(config)?;
    let user = super::resolve_user(&args.user, &store)?;
    store.delete_user(user.id)?;
    println!("Removed {} and their tasks", user.username);
    Ok(())
}
