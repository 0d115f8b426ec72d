//! Raw tool dispatch CLI command
//!
//! The seam an agent loop drives: the LLM's classified intent arrives as a
//! JSON tool call, the outcome goes back as JSON for the model to narrate.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use std::io::Read;

use crate::agent::{Dispatcher, ToolCall};
use crate::config::Config;

#[derive(Args)]
pub struct ToolArgs {
    /// User ID, phone number, or username the call runs as
    #[arg(short, long)]
    user: String,

    /// Tool call JSON; '-' reads from stdin
    #[arg(long)]
    json: String,
}

pub async fn run(config: &Config, args: ToolArgs) -> Result<()> {
    let payload = if args.json == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read tool call from stdin")?;
        buf
    } else {
        args.json
    };

    let call: ToolCall =
        serde_json::from_str(&payload).context("Failed to decode tool call")?;

    let mut store = super::open_store(config)?;
    let user = super::resolve_user(&args.user, &store)?;

    let mut dispatcher = Dispatcher::new(config, &mut store);
    let outcome = dispatcher.dispatch(user.id, Utc::now(), call)?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
