//! Schedule types for class occurrences, study tasks and suggestions.
//!
//! These are the shapes that cross the engine boundary: raw class records
//! and task descriptors come in, suggestions and the unscheduled residual
//! go out.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

pub mod recurring;
pub mod time;

pub use recurring::{expand_weekly_classes, WeeklyClass};

/// A class occurrence as supplied by the calendar/subject collaborator.
///
/// Either `date` plus `startTime`/`endTime` (each `"HH:MM"` or a full
/// timestamp), or `startDateTime`/`endDateTime` may be present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawClassOccurrence {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub start_date_time: Option<String>,
    #[serde(default)]
    pub end_date_time: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl RawClassOccurrence {
    /// Occurrence on `date` between two `"HH:MM"` times.
    pub fn on_day(date: NaiveDate, start: &str, end: &str) -> Self {
        Self {
            date: Some(date.format("%Y-%m-%d").to_string()),
            start_time: Some(start.to_string()),
            end_time: Some(end.to_string()),
            ..Self::default()
        }
    }
}

/// Time representation of an occurrence after ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccurrenceTime {
    /// Both endpoints carried as absolute instants
    Absolute {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    /// A calendar day plus day-relative times
    DayAndTime {
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    },
}

impl OccurrenceTime {
    /// Resolve to absolute `(start, end)` instants.
    pub fn resolve(&self) -> (NaiveDateTime, NaiveDateTime) {
        match *self {
            OccurrenceTime::Absolute { start, end } => (start, end),
            OccurrenceTime::DayAndTime { date, start, end } => {
                (date.and_time(start), date.and_time(end))
            }
        }
    }
}

/// A class occurrence with absolute, well-ordered endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedOccurrence {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub subject: Option<String>,
    pub title: Option<String>,
}

impl NormalizedOccurrence {
    pub fn day(&self) -> NaiveDate {
        self.start.date()
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Sort rank, lower is more urgent.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

/// A study task as supplied by the task store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDescriptor {
    pub id: String,
    pub title: String,
    #[serde(
        default,
        alias = "estimatedTime",
        deserialize_with = "time::deserialize_minutes"
    )]
    pub estimated_time_minutes: i64,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, deserialize_with = "time::deserialize_optional_instant")]
    pub due_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl TaskDescriptor {
    pub fn new(id: impl Into<String>, title: impl Into<String>, estimated_time_minutes: i64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            estimated_time_minutes,
            priority: Priority::Medium,
            due_date: None,
            subject: None,
            completed: false,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDateTime) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Non-completed with a positive duration.
    pub fn is_eligible(&self) -> bool {
        !self.completed && self.estimated_time_minutes > 0
    }
}

/// One placement of a task into a concrete time interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSuggestion {
    pub task_id: String,
    pub title: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub duration_minutes: i64,
    pub subject: Option<String>,
    pub priority: Priority,
    pub day_key: NaiveDate,
}

/// Outcome of one engine invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    pub success: bool,
    pub suggestions: Vec<ScheduleSuggestion>,
    pub unscheduled_tasks: Vec<TaskDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ScheduleResult {
    pub fn completed(suggestions: Vec<ScheduleSuggestion>, unscheduled_tasks: Vec<TaskDescriptor>) -> Self {
        Self {
            success: true,
            suggestions,
            unscheduled_tasks,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>, unscheduled_tasks: Vec<TaskDescriptor>) -> Self {
        Self {
            success: false,
            suggestions: Vec::new(),
            unscheduled_tasks,
            message: Some(message.into()),
        }
    }

    /// Suggestions grouped by calendar day, each group in start order.
    pub fn by_day(&self) -> BTreeMap<NaiveDate, Vec<&ScheduleSuggestion>> {
        let mut days: BTreeMap<NaiveDate, Vec<&ScheduleSuggestion>> = BTreeMap::new();
        for suggestion in &self.suggestions {
            days.entry(suggestion.day_key).or_default().push(suggestion);
        }
        days
    }

    /// Total suggested study minutes per day.
    pub fn minutes_by_day(&self) -> BTreeMap<NaiveDate, i64> {
        let mut totals = BTreeMap::new();
        for suggestion in &self.suggestions {
            *totals.entry(suggestion.day_key).or_insert(0) += suggestion.duration_minutes;
        }
        totals
    }
}
