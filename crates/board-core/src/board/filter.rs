//! Task Filters
//!
//! Render-time filtering of task cards. Never changes ordering.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskFilter {
    #[default]
    All,
    Incomplete,
    Completed,
    DueThisWeek,
    DueNextWeek,
}

impl TaskFilter {
    pub const ALL: [TaskFilter; 5] = [
        TaskFilter::All,
        TaskFilter::Incomplete,
        TaskFilter::Completed,
        TaskFilter::DueThisWeek,
        TaskFilter::DueNextWeek,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TaskFilter::All => "All tasks",
            TaskFilter::Incomplete => "Incomplete tasks",
            TaskFilter::Completed => "Completed tasks",
            TaskFilter::DueThisWeek => "Due this week",
            TaskFilter::DueNextWeek => "Due next week",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.label() == label)
    }

    pub fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Incomplete => !task.is_completed,
            TaskFilter::Completed => task.is_completed,
            TaskFilter::DueThisWeek => due_within(task, week_bounds(today)),
            TaskFilter::DueNextWeek => due_within(task, week_bounds(today + Duration::days(7))),
        }
    }
}

/// Monday..=Sunday of the week containing `day`
pub fn week_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = day - Duration::days(i64::from(day.weekday().num_days_from_monday()));
    (monday, monday + Duration::days(6))
}

fn due_within(task: &Task, (start, end): (NaiveDate, NaiveDate)) -> bool {
    task.due_date.is_some_and(|due| due >= start && due <= end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn due(on: Option<NaiveDate>) -> Task {
        let mut task = Task::new("t1", "Ship", "c1");
        task.due_date = on;
        task
    }

    #[test]
    fn test_week_bounds_monday_to_sunday() {
        // 2024-05-08 is a Wednesday
        assert_eq!(week_bounds(date(2024, 5, 8)), (date(2024, 5, 6), date(2024, 5, 12)));
        // Sunday belongs to the week that started the Monday before
        assert_eq!(week_bounds(date(2024, 5, 12)), (date(2024, 5, 6), date(2024, 5, 12)));
    }

    #[test]
    fn test_due_filters() {
        let today = date(2024, 5, 8);
        assert!(TaskFilter::DueThisWeek.matches(&due(Some(date(2024, 5, 12))), today));
        assert!(!TaskFilter::DueThisWeek.matches(&due(Some(date(2024, 5, 13))), today));
        assert!(TaskFilter::DueNextWeek.matches(&due(Some(date(2024, 5, 13))), today));
        assert!(!TaskFilter::DueNextWeek.matches(&due(None), today));
    }

    #[test]
    fn test_completion_filters_and_labels() {
        let today = date(2024, 5, 8);
        let mut task = due(None);
        assert!(TaskFilter::Incomplete.matches(&task, today));
        task.is_completed = true;
        assert!(TaskFilter::Completed.matches(&task, today));
        assert!(TaskFilter::All.matches(&task, today));
        assert_eq!(TaskFilter::from_label("Due next week"), Some(TaskFilter::DueNextWeek));
        assert_eq!(TaskFilter::from_label("Whatever"), None);
    }
}
