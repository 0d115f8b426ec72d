//! Daily plan construction: validation, filtering, ordering, flagging

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::Serialize;
use tracing::warn;

use super::window::{DayBounds, PlanWindow};
use crate::task::{Task, TaskId, TaskPriority, TaskStatus};

/// Flags attached to a planned task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskFlags {
    /// Due date already passed without completion
    pub at_risk: bool,
    /// Less time left before the due date than the estimated duration
    pub tight: bool,
}

/// One task in the plan, in final order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanEntry {
    pub task: Task,
    pub flags: TaskFlags,
}

/// Aggregate tallies over the plan entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlanCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
}

/// Task excluded from the plan for violating an invariant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedTask {
    pub id: TaskId,
    pub title: String,
    pub reason: String,
}

/// The ordered daily plan for one user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPlan {
    /// Target day in the user's timezone
    pub date: NaiveDate,
    /// Tasks in priority/due/creation order
    pub entries: Vec<PlanEntry>,
    pub counts: PlanCounts,
    /// Tasks dropped at the validation boundary
    pub skipped: Vec<SkippedTask>,
}

impl DailyPlan {
    /// Nothing scheduled. Distinct from an error; the renderer emits the
    /// "no tasks" message for this case.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compute the daily plan for one user's task snapshot.
///
/// Tasks qualify when their due or working datetime falls on a day inside
/// the window, or when they are still open with a due date in the past
/// (overdue carry-over). Archived tasks never appear. Tasks violating the
/// priority/duration invariants are excluded individually and recorded in
/// `skipped`; they never abort the rest of the plan.
pub fn build_daily_plan(
    now: DateTime<Utc>,
    tz: FixedOffset,
    tasks: Vec<Task>,
    window: PlanWindow,
) -> DailyPlan {
    let bounds = window.resolve(now, tz);

    let mut entries = Vec::new();
    let mut skipped = Vec::new();

    for task in tasks {
        if task.status == TaskStatus::Archived {
            continue;
        }
        if let Err(err) = task.validate() {
            warn!(task_id = %task.id, %err, "excluding task from plan");
            skipped.push(SkippedTask {
                id: task.id,
                title: task.title.clone(),
                reason: err.to_string(),
            });
            continue;
        }
        if !qualifies(&task, now, tz, &bounds) {
            continue;
        }
        let flags = flag(&task, now);
        entries.push(PlanEntry { task, flags });
    }

    entries.sort_by_key(|e| order_key(&e.task));
    let counts = tally(&entries);

    DailyPlan {
        date: bounds.target,
        entries,
        counts,
        skipped,
    }
}

fn qualifies(task: &Task, now: DateTime<Utc>, tz: FixedOffset, bounds: &DayBounds) -> bool {
    let on_window_day = |dt: Option<DateTime<Utc>>| {
        dt.is_some_and(|t| bounds.contains(t.with_timezone(&tz).date_naive()))
    };
    if on_window_day(task.due_dt) || on_window_day(task.working_dt) {
        return true;
    }
    // Overdue carry-over: open tasks keep appearing until handled
    matches!(task.status, TaskStatus::Pending | TaskStatus::InProgress)
        && task.due_dt.is_some_and(|due| due < now)
}

fn flag(task: &Task, now: DateTime<Utc>) -> TaskFlags {
    if task.status == TaskStatus::Completed {
        return TaskFlags::default();
    }
    let Some(due) = task.due_dt else {
        return TaskFlags::default();
    };
    TaskFlags {
        at_risk: due < now,
        tight: due.signed_duration_since(now) < Duration::minutes(task.duration_mins),
    }
}

/// Total order: priority level, then due date with missing-last, then
/// creation time, then ID bytes so ties cannot depend on input order.
fn order_key(task: &Task) -> (u8, u8, DateTime<Utc>, DateTime<Utc>, TaskId) {
    let (missing_due, due) = match task.due_dt {
        Some(due) => (0, due),
        None => (1, DateTime::<Utc>::MAX_UTC),
    };
    (task.priority, missing_due, due, task.created_at, task.id)
}

fn tally(entries: &[PlanEntry]) -> PlanCounts {
    let mut counts = PlanCounts::default();
    for entry in entries {
        match TaskPriority::from_level(entry.task.priority) {
            Some(TaskPriority::High) => counts.high += 1,
            Some(TaskPriority::Medium) => counts.medium += 1,
            Some(TaskPriority::Low) => counts.low += 1,
            // Unreachable past validation
            None => {}
        }
        match entry.task.status {
            TaskStatus::Pending => counts.pending += 1,
            TaskStatus::InProgress => counts.in_progress += 1,
            TaskStatus::Completed => counts.completed += 1,
            TaskStatus::Archived => {}
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::UserId;
    use chrono::TimeZone;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap()
    }

    fn task(user: UserId, title: &str) -> Task {
        Task::new(user, title, now())
    }

    #[test]
    fn test_empty_input_empty_plan() {
        let plan = build_daily_plan(now(), utc(), Vec::new(), PlanWindow::today_only());
        assert!(plan.is_empty());
        assert_eq!(plan.counts, PlanCounts::default());
        assert!(plan.skipped.is_empty());
    }

    #[test]
    fn test_ordering_priority_then_due_then_created() {
        let user = UserId::new();
        let t = now();

        let mut low_early = task(user, "low early");
        low_early.priority = 3;
        low_early.due_dt = Some(t + Duration::hours(1));

        let mut high_late = task(user, "high late");
        high_late.priority = 1;
        high_late.due_dt = Some(t + Duration::hours(5));

        let mut high_early = task(user, "high early");
        high_early.priority = 1;
        high_early.due_dt = Some(t + Duration::hours(2));

        let mut high_no_due = task(user, "high no due");
        high_no_due.priority = 1;
        high_no_due.working_dt = Some(t);

        let plan = build_daily_plan(
            t,
            utc(),
            vec![
                low_early.clone(),
                high_late.clone(),
                high_no_due.clone(),
                high_early.clone(),
            ],
            PlanWindow::today_only(),
        );

        let titles: Vec<&str> = plan.entries.iter().map(|e| e.task.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["high early", "high late", "high no due", "low early"]
        );
    }

    #[test]
    fn test_creation_tiebreak_is_stable() {
        let user = UserId::new();
        let t = now();
        let due = t + Duration::hours(3);

        let mut first = task(user, "first");
        first.due_dt = Some(due);
        first.created_at = t - Duration::hours(2);

        let mut second = task(user, "second");
        second.due_dt = Some(due);
        second.created_at = t - Duration::hours(1);

        // Input order reversed; creation time decides
        let plan = build_daily_plan(
            t,
            utc(),
            vec![second.clone(), first.clone()],
            PlanWindow::today_only(),
        );
        assert_eq!(plan.entries[0].task.title, "first");
        assert_eq!(plan.entries[1].task.title, "second");
    }

    #[test]
    fn test_idempotent() {
        let user = UserId::new();
        let t = now();
        let mut a = task(user, "a");
        a.due_dt = Some(t + Duration::hours(1));
        let mut b = task(user, "b");
        b.priority = 1;
        b.due_dt = Some(t - Duration::hours(30));

        let tasks = vec![a, b];
        let plan1 = build_daily_plan(t, utc(), tasks.clone(), PlanWindow::today_only());
        let plan2 = build_daily_plan(t, utc(), tasks, PlanWindow::today_only());
        assert_eq!(plan1, plan2);
    }

    #[test]
    fn test_overdue_carry_over_flagged_at_risk() {
        let user = UserId::new();
        let t = now();
        let mut overdue = task(user, "overdue");
        overdue.due_dt = Some(t - Duration::days(1));

        let plan = build_daily_plan(t, utc(), vec![overdue], PlanWindow::today_only());
        assert_eq!(plan.entries.len(), 1);
        assert!(plan.entries[0].flags.at_risk);
    }

    #[test]
    fn test_completed_overdue_not_carried_not_at_risk() {
        let user = UserId::new();
        let t = now();
        let mut done = task(user, "done yesterday");
        done.status = TaskStatus::Completed;
        done.due_dt = Some(t - Duration::days(1));

        // Due yesterday, outside today's window, completed: not carried over
        let plan = build_daily_plan(t, utc(), vec![done], PlanWindow::today_only());
        assert!(plan.is_empty());
    }

    #[test]
    fn test_tight_flag() {
        let user = UserId::new();
        let t = now();
        let mut tight = task(user, "tight");
        tight.due_dt = Some(t + Duration::minutes(10));
        tight.duration_mins = 30;

        let mut roomy = task(user, "roomy");
        roomy.due_dt = Some(t + Duration::hours(3));
        roomy.duration_mins = 30;

        let plan = build_daily_plan(t, utc(), vec![tight, roomy], PlanWindow::today_only());
        let by_title = |title: &str| {
            plan.entries
                .iter()
                .find(|e| e.task.title == title)
                .map(|e| e.flags)
                .unwrap()
        };
        assert!(by_title("tight").tight);
        assert!(!by_title("tight").at_risk);
        assert!(!by_title("roomy").tight);
    }

    #[test]
    fn test_invalid_priority_excludes_only_that_task() {
        let user = UserId::new();
        let t = now();

        let mut tasks = Vec::new();
        for i in 0..9 {
            let mut ok = task(user, &format!("ok {}", i));
            ok.due_dt = Some(t + Duration::hours(1));
            tasks.push(ok);
        }
        let mut bad = task(user, "bad");
        bad.priority = 5;
        bad.due_dt = Some(t + Duration::hours(1));
        tasks.push(bad);

        let plan = build_daily_plan(t, utc(), tasks, PlanWindow::today_only());
        assert_eq!(plan.entries.len(), 9);
        assert_eq!(plan.skipped.len(), 1);
        assert_eq!(plan.skipped[0].title, "bad");
        assert!(plan.skipped[0].reason.contains("priority"));
    }

    #[test]
    fn test_negative_duration_excluded() {
        let user = UserId::new();
        let t = now();
        let mut bad = task(user, "bad duration");
        bad.duration_mins = -5;
        bad.due_dt = Some(t + Duration::hours(1));

        let plan = build_daily_plan(t, utc(), vec![bad], PlanWindow::today_only());
        assert!(plan.is_empty());
        assert_eq!(plan.skipped.len(), 1);
    }

    #[test]
    fn test_archived_never_appears() {
        let user = UserId::new();
        let t = now();
        let mut archived = task(user, "archived");
        archived.status = TaskStatus::Archived;
        archived.due_dt = Some(t + Duration::hours(1));

        let plan = build_daily_plan(t, utc(), vec![archived], PlanWindow::today_only());
        assert!(plan.is_empty());
    }

    #[test]
    fn test_working_dt_alone_qualifies() {
        let user = UserId::new();
        let t = now();
        let mut scheduled = task(user, "scheduled");
        scheduled.working_dt = Some(t + Duration::hours(2));

        let plan = build_daily_plan(t, utc(), vec![scheduled], PlanWindow::today_only());
        assert_eq!(plan.entries.len(), 1);
        // No due date: no flags
        assert_eq!(plan.entries[0].flags, TaskFlags::default());
    }

    #[test]
    fn test_tomorrow_due_outside_default_window() {
        let user = UserId::new();
        let t = now();
        let mut tomorrow = task(user, "tomorrow");
        tomorrow.due_dt = Some(t + Duration::days(1));

        let plan = build_daily_plan(t, utc(), vec![tomorrow.clone()], PlanWindow::today_only());
        assert!(plan.is_empty());

        // Widening the window brings it in
        let window = PlanWindow {
            target: None,
            lookback_days: 0,
            lookahead_days: 1,
        };
        let plan = build_daily_plan(t, utc(), vec![tomorrow], window);
        assert_eq!(plan.entries.len(), 1);
    }

    #[test]
    fn test_counts() {
        let user = UserId::new();
        let t = now();

        let mut high = task(user, "high");
        high.priority = 1;
        high.due_dt = Some(t + Duration::hours(1));

        let mut done = task(user, "done");
        done.status = TaskStatus::Completed;
        done.due_dt = Some(t + Duration::hours(2));

        let plan = build_daily_plan(t, utc(), vec![high, done], PlanWindow::today_only());
        assert_eq!(plan.counts.high, 1);
        assert_eq!(plan.counts.medium, 1);
        assert_eq!(plan.counts.pending, 1);
        assert_eq!(plan.counts.completed, 1);
        assert_eq!(plan.counts.in_progress, 0);
    }

    #[test]
    fn test_timezone_shifts_target_day() {
        let user = UserId::new();
        // 23:00 UTC; at UTC+10 it is already 09:00 the next day
        let t = Utc.with_ymd_and_hms(2026, 6, 15, 23, 0, 0).unwrap();
        let tz = FixedOffset::east_opt(10 * 3600).unwrap();

        let mut next_day = task(user, "next day local");
        // 01:00 UTC Jun 16 = 11:00 Jun 16 at UTC+10
        next_day.working_dt = Some(Utc.with_ymd_and_hms(2026, 6, 16, 1, 0, 0).unwrap());

        let plan = build_daily_plan(t, tz, vec![next_day], PlanWindow::today_only());
        assert_eq!(plan.date, NaiveDate::from_ymd_opt(2026, 6, 16).unwrap());
        assert_eq!(plan.entries.len(), 1);
    }
}
