//! Daily plan engine
//!
//! Pure computation: a snapshot of one user's tasks plus a reference time
//! go in, an ordered and flagged daily plan comes out. No I/O, no storage
//! mutation; calling twice with identical inputs yields identical plans.
//! Invocations for different users share no state, so a batch caller may
//! run them in parallel freely.

pub mod planner;
pub mod window;

pub use planner::{build_daily_plan, DailyPlan, PlanCounts, PlanEntry, SkippedTask, TaskFlags};
pub use window::PlanWindow;
