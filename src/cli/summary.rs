//! Daily summary CLI command

use anyhow::{bail, Result};
use chrono::{NaiveDate, Utc};
use clap::Args;

use crate::config::Config;
use crate::plan::{build_daily_plan, PlanWindow};
use crate::store::TaskStore;
use crate::summary::{render_plan, run_batch, Delivery, StdoutDelivery};

#[derive(Args)]
pub struct SummaryArgs {
    /// Target day (YYYY-MM-DD); defaults to today
    #[arg(long)]
    date: Option<String>,

    /// Summarize one user (ID, phone number, or username)
    #[arg(short, long)]
    user: Option<String>,

    /// Summarize every registered user
    #[arg(long)]
    all: bool,

    /// Days before the target day to include
    #[arg(long)]
    lookback: Option<u32>,

    /// Days after the target day to include
    #[arg(long)]
    lookahead: Option<u32>,
}

pub async fn run(config: &Config, args: SummaryArgs) -> Result<()> {
    if args.user.is_none() && !args.all {
        bail!("Pass --user <id> or --all");
    }

    let target = match &args.date {
        Some(s) => Some(
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| anyhow::anyhow!("Invalid date '{}': use YYYY-MM-DD", s))?,
        ),
        None => None,
    };
    let window = PlanWindow {
        target,
        lookback_days: args.lookback.unwrap_or(config.summary.lookback_days),
        lookahead_days: args.lookahead.unwrap_or(config.summary.lookahead_days),
    };

    let store = super::open_store(config)?;
    let now = Utc::now();
    let delivery = StdoutDelivery;

    if let Some(user_ref) = &args.user {
        let user = super::resolve_user(user_ref, &store)?;
        let tasks = store.fetch_tasks(user.id, now)?;
        let plan = build_daily_plan(now, config.utc_offset(), tasks, window);
        let message = render_plan(&user.username, &plan, config.utc_offset());
        delivery.send(&user, &message)?;
        return Ok(());
    }

    let report = run_batch(now, config, &store, &delivery, window)?;
    println!(
        "Delivered {} summaries, {} failed",
        report.delivered, report.failed
    );
    Ok(())
}
