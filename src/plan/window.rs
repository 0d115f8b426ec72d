//! Plan window resolution

use chrono::{DateTime, Days, FixedOffset, NaiveDate, Utc};

/// The stretch of days a plan covers, centered on a target day.
/// Defaults to today only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanWindow {
    /// Target day in the user's timezone; `None` means the day `now`
    /// falls on.
    pub target: Option<NaiveDate>,
    /// Whole days before the target day to include
    pub lookback_days: u32,
    /// Whole days after the target day to include
    pub lookahead_days: u32,
}

impl PlanWindow {
    pub fn today_only() -> Self {
        Self::default()
    }

    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            target: Some(date),
            ..Self::default()
        }
    }

    /// Resolve against `now` in the user's offset. Saturates at the
    /// calendar limits rather than wrapping.
    pub(crate) fn resolve(&self, now: DateTime<Utc>, tz: FixedOffset) -> DayBounds {
        let target = self
            .target
            .unwrap_or_else(|| now.with_timezone(&tz).date_naive());
        let first = target
            .checked_sub_days(Days::new(u64::from(self.lookback_days)))
            .unwrap_or(NaiveDate::MIN);
        let last = target
            .checked_add_days(Days::new(u64::from(self.lookahead_days)))
            .unwrap_or(NaiveDate::MAX);
        DayBounds {
            target,
            first,
            last,
        }
    }
}

/// Resolved inclusive day range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DayBounds {
    pub target: NaiveDate,
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl DayBounds {
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.first <= day && day <= self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_window_is_today_in_offset() {
        // 23:30 UTC on Jan 1 is already Jan 2 at UTC+2
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 23, 30, 0).unwrap();
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();

        let bounds = PlanWindow::today_only().resolve(now, tz);
        let jan2 = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        assert_eq!(bounds.target, jan2);
        assert_eq!(bounds.first, jan2);
        assert_eq!(bounds.last, jan2);
    }

    #[test]
    fn test_lookback_lookahead() {
        let now = Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap();
        let tz = FixedOffset::east_opt(0).unwrap();

        let window = PlanWindow {
            target: None,
            lookback_days: 1,
            lookahead_days: 2,
        };
        let bounds = window.resolve(now, tz);
        assert_eq!(bounds.first, NaiveDate::from_ymd_opt(2026, 1, 9).unwrap());
        assert_eq!(bounds.last, NaiveDate::from_ymd_opt(2026, 1, 12).unwrap());
        assert!(bounds.contains(NaiveDate::from_ymd_opt(2026, 1, 10).unwrap()));
        assert!(!bounds.contains(NaiveDate::from_ymd_opt(2026, 1, 13).unwrap()));
    }

    #[test]
    fn test_explicit_target_date() {
        let now = Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap();
        let tz = FixedOffset::east_opt(0).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();

        let bounds = PlanWindow::for_date(date).resolve(now, tz);
        assert_eq!(bounds.target, date);
        assert_eq!(bounds.first, date);
        assert_eq!(bounds.last, date);
    }
}
