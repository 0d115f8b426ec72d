//! Plan rendering

use chrono::FixedOffset;

use crate::plan::{DailyPlan, PlanEntry};
use crate::task::{TaskPriority, TaskStatus};

/// Render a daily plan as the message the user receives.
///
/// An empty plan gets its own distinct message rather than an empty body,
/// so "nothing scheduled" is never confused with a failed run.
pub fn render_plan(username: &str, plan: &DailyPlan, tz: FixedOffset) -> String {
    if plan.is_empty() {
        let mut out = format!(
            "Hello {}, you have no tasks scheduled for {}. Enjoy your day!",
            username, plan.date
        );
        push_skipped_note(&mut out, plan);
        return out;
    }

    let mut out = format!(
        "Hello {}, here is your plan for {}:\n",
        username, plan.date
    );
    for entry in &plan.entries {
        out.push('\n');
        out.push_str(&render_line(entry, tz));
    }

    let c = &plan.counts;
    out.push_str(&format!(
        "\n\n{} high / {} medium / {} low priority",
        c.high, c.medium, c.low
    ));
    out.push_str(&format!(
        "\n{} pending, {} in progress, {} completed",
        c.pending, c.in_progress, c.completed
    ));

    push_skipped_note(&mut out, plan);
    out
}

fn push_skipped_note(out: &mut String, plan: &DailyPlan) {
    if !plan.skipped.is_empty() {
        out.push_str(&format!(
            "\n({} task(s) had invalid data and were left out)",
            plan.skipped.len()
        ));
    }
}

fn render_line(entry: &PlanEntry, tz: FixedOffset) -> String {
    let task = &entry.task;
    let priority = TaskPriority::from_level(task.priority)
        .map(|p| p.label())
        .unwrap_or("?");

    let mut line = format!("- [{}] {}", priority, task.title);

    if let Some(due) = task.due_dt {
        line.push_str(&format!(
            " (due {})",
            due.with_timezone(&tz).format("%Y-%m-%d %H:%M")
        ));
    } else if let Some(working) = task.working_dt {
        line.push_str(&format!(
            " (scheduled {})",
            working.with_timezone(&tz).format("%Y-%m-%d %H:%M")
        ));
    }

    if task.status == TaskStatus::InProgress {
        line.push_str(" [in progress]");
    } else if task.status == TaskStatus::Completed {
        line.push_str(" [done]");
    }

    if entry.flags.at_risk {
        line.push_str(" [overdue]");
    } else if entry.flags.tight {
        line.push_str(" [tight]");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{build_daily_plan, PlanWindow};
    use crate::task::Task;
    use crate::user::UserId;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 15, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_plan_message() {
        let plan = build_daily_plan(now(), utc(), Vec::new(), PlanWindow::today_only());
        let message = render_plan("ada", &plan, utc());
        assert!(message.contains("no tasks scheduled"));
        assert!(message.contains("ada"));
        assert!(message.contains("2026-06-15"));
    }

    #[test]
    fn test_rendered_lines_and_tallies() {
        let user = UserId::new();
        let t = now();

        let mut urgent = Task::new(user, "Ship release", t);
        urgent.priority = 1;
        urgent.due_dt = Some(t - Duration::hours(2));

        let mut chore = Task::new(user, "Water plants", t);
        chore.priority = 3;
        chore.working_dt = Some(t + Duration::hours(4));

        let plan = build_daily_plan(t, utc(), vec![urgent, chore], PlanWindow::today_only());
        let message = render_plan("ada", &plan, utc());

        assert!(message.contains("- [high] Ship release"));
        assert!(message.contains("[overdue]"));
        assert!(message.contains("- [low] Water plants (scheduled 2026-06-15 12:00)"));
        assert!(message.contains("1 high / 0 medium / 1 low priority"));
        assert!(message.contains("2 pending, 0 in progress, 0 completed"));
    }

    #[test]
    fn test_skipped_tasks_mentioned() {
        let user = UserId::new();
        let t = now();
        let mut bad = Task::new(user, "bad", t);
        bad.priority = 9;
        bad.due_dt = Some(t);

        let plan = build_daily_plan(t, utc(), vec![bad], PlanWindow::today_only());
        let message = render_plan("ada", &plan, utc());
        assert!(message.contains("no tasks scheduled"));
        assert!(message.contains("1 task(s) had invalid data"));
    }
}
