//! Batch summary runs

use chrono::{DateTime, Utc};
use tracing::{error, info};

use super::{render_plan, Delivery};
use crate::config::Config;
use crate::plan::{build_daily_plan, PlanWindow};
use crate::store::{Result, TaskStore};

/// Outcome of one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Compute and deliver the daily summary for every user.
///
/// Each user's computation only reads that user's snapshot, so failures
/// stay local: a failed snapshot or send is logged and counted, and the
/// run moves on to the next user. Only the initial user listing is fatal.
pub fn run_batch(
    now: DateTime<Utc>,
    config: &Config,
    store: &dyn TaskStore,
    delivery: &dyn Delivery,
    window: PlanWindow,
) -> Result<BatchReport> {
    let users = store.list_users()?;
    let tz = config.utc_offset();
    let mut report = BatchReport::default();

    for user in users {
        let tasks = match store.fetch_tasks(user.id, now) {
            Ok(tasks) => tasks,
            Err(err) => {
                error!(user_id = %user.id, %err, "snapshot failed, skipping user");
                report.failed += 1;
                continue;
            }
        };

        let plan = build_daily_plan(now, tz, tasks, window);
        let message = render_plan(&user.username, &plan, tz);

        match delivery.send(&user, &message) {
            Ok(()) => report.delivered += 1,
            Err(err) => {
                error!(user_id = %user.id, %err, "delivery failed");
                report.failed += 1;
            }
        }
    }

    info!(
        delivered = report.delivered,
        failed = report.failed,
        "daily summary batch finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, TaskStore};
    use crate::task::Task;
    use crate::user::User;
    use chrono::TimeZone;
    use std::sync::Mutex;

    struct CollectingDelivery {
        sent: Mutex<Vec<(String, String)>>,
        fail_for: Option<String>,
    }

    impl CollectingDelivery {
        fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_for: None,
            }
        }
    }

    impl Delivery for CollectingDelivery {
        fn send(&self, user: &User, message: &str) -> anyhow::Result<()> {
            if self.fail_for.as_deref() == Some(user.username.as_str()) {
                anyhow::bail!("transport refused the message");
            }
            self.sent
                .lock()
                .unwrap()
                .push((user.username.clone(), message.to_string()));
            Ok(())
        }
    }

    #[test]
    fn test_batch_delivers_to_all_users() {
        let mut store = MemoryStore::new();
        let ada = store.upsert_user("+15550001", "ada").unwrap();
        store.upsert_user("+15550002", "grace").unwrap();
        let now = Utc.with_ymd_and_hms(2026, 6, 15, 7, 0, 0).unwrap();

        let mut task = Task::new(ada.id, "Morning task", now);
        task.working_dt = Some(now);
        store.insert_task(task).unwrap();

        let delivery = CollectingDelivery::new();
        let report = run_batch(
            now,
            &Config::default(),
            &store,
            &delivery,
            PlanWindow::today_only(),
        )
        .unwrap();

        assert_eq!(report.delivered, 2);
        assert_eq!(report.failed, 0);

        let sent = delivery.sent.lock().unwrap();
        let ada_msg = &sent.iter().find(|(u, _)| u == "ada").unwrap().1;
        let grace_msg = &sent.iter().find(|(u, _)| u == "grace").unwrap().1;
        assert!(ada_msg.contains("Morning task"));
        assert!(grace_msg.contains("no tasks scheduled"));
    }

    #[test]
    fn test_one_failed_delivery_does_not_stop_the_run() {
        let mut store = MemoryStore::new();
        store.upsert_user("+15550001", "ada").unwrap();
        store.upsert_user("+15550002", "grace").unwrap();
        let now = Utc.with_ymd_and_hms(2026, 6, 15, 7, 0, 0).unwrap();

        let mut delivery = CollectingDelivery::new();
        delivery.fail_for = Some("ada".to_string());

        let report = run_batch(
            now,
            &Config::default(),
            &store,
            &delivery,
            PlanWindow::today_only(),
        )
        .unwrap();

        assert_eq!(report.delivered, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(delivery.sent.lock().unwrap()[0].0, "grace");
    }

    #[test]
    fn test_malformed_task_does_not_poison_other_users() {
        let mut store = MemoryStore::new();
        let ada = store.upsert_user("+15550001", "ada").unwrap();
        let grace = store.upsert_user("+15550002", "grace").unwrap();
        let now = Utc.with_ymd_and_hms(2026, 6, 15, 7, 0, 0).unwrap();

        // Bypass the write backstop, as a legacy record would
        let mut bad = Task::new(ada.id, "corrupt", now);
        bad.priority = 42;
        bad.due_dt = Some(now);
        store.insert_task_unchecked(bad);

        let mut fine = Task::new(grace.id, "fine", now);
        fine.due_dt = Some(now + chrono::Duration::hours(2));
        store.insert_task(fine).unwrap();

        let delivery = CollectingDelivery::new();
        let report = run_batch(
            now,
            &Config::default(),
            &store,
            &delivery,
            PlanWindow::today_only(),
        )
        .unwrap();

        // Both users still get a summary; ada's notes the dropped task
        assert_eq!(report.delivered, 2);
        let sent = delivery.sent.lock().unwrap();
        let ada_msg = &sent.iter().find(|(u, _)| u == "ada").unwrap().1;
        let grace_msg = &sent.iter().find(|(u, _)| u == "grace").unwrap().1;
        assert!(ada_msg.contains("invalid data"));
        assert!(grace_msg.contains("fine"));
    }
}
