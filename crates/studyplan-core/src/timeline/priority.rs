//! Task eligibility and ordering.
//!
//! Tasks are ordered by:
//! - Priority (High before Medium before Low)
//! - Due date, earliest first
//! - Tasks with a due date before tasks without one
//!
//! Ties keep their input order.

use std::cmp::Ordering;

use crate::schedule::TaskDescriptor;

/// Tasks worth scheduling: not completed and with a positive estimate.
pub fn eligible_tasks(tasks: &[TaskDescriptor]) -> Vec<TaskDescriptor> {
    tasks.iter().filter(|t| t.is_eligible()).cloned().collect()
}

/// Scheduling order of two tasks.
pub fn compare_tasks(a: &TaskDescriptor, b: &TaskDescriptor) -> Ordering {
    a.priority
        .rank()
        .cmp(&b.priority.rank())
        .then_with(|| match (&a.due_date, &b.due_date) {
            (Some(a_due), Some(b_due)) => a_due.cmp(b_due),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

/// Sort tasks into scheduling order (stable).
pub fn sort_by_priority(tasks: &mut [TaskDescriptor]) {
    tasks.sort_by(compare_tasks);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::Priority;
    use chrono::NaiveDate;

    fn due(day: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, day)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap()
    }

    fn ids(tasks: &[TaskDescriptor]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_priority_ordering() {
        let mut tasks = vec![
            TaskDescriptor::new("low", "Low", 30).with_priority(Priority::Low),
            TaskDescriptor::new("high", "High", 30).with_priority(Priority::High),
            TaskDescriptor::new("medium", "Medium", 30),
        ];

        sort_by_priority(&mut tasks);

        assert_eq!(ids(&tasks), vec!["high", "medium", "low"]);
    }

    #[test]
    fn test_due_date_breaks_ties() {
        let mut tasks = vec![
            TaskDescriptor::new("none", "No due date", 30),
            TaskDescriptor::new("late", "Late", 30).with_due_date(due(25)),
            TaskDescriptor::new("soon", "Soon", 30).with_due_date(due(20)),
            TaskDescriptor::new("none-2", "No due date either", 30),
        ];

        sort_by_priority(&mut tasks);

        assert_eq!(ids(&tasks), vec!["soon", "late", "none", "none-2"]);
    }

    #[test]
    fn test_priority_beats_due_date() {
        let mut tasks = vec![
            TaskDescriptor::new("urgent-low", "Urgent but low", 30)
                .with_priority(Priority::Low)
                .with_due_date(due(19)),
            TaskDescriptor::new("high", "High, no due date", 30).with_priority(Priority::High),
        ];

        sort_by_priority(&mut tasks);

        assert_eq!(ids(&tasks), vec!["high", "urgent-low"]);
    }

    #[test]
    fn test_eligible_tasks_filter() {
        let mut done = TaskDescriptor::new("done", "Done", 60);
        done.completed = true;
        let tasks = vec![
            TaskDescriptor::new("zero", "Zero", 0),
            done,
            TaskDescriptor::new("ok", "Ok", 45),
        ];

        assert_eq!(ids(&eligible_tasks(&tasks)), vec!["ok"]);
    }
}
