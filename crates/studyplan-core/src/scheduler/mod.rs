//! Automatic study-session scheduler.
//!
//! This module turns a class timetable and a task list into concrete study
//! suggestions:
//! - Normalizes class occurrences and groups them by day
//! - Builds busy periods (classes plus travel) for every day of the horizon
//! - Finds free slots inside the 06:00-22:00 working window
//! - Packs prioritized tasks into those slots under a daily study cap
//!
//! The engine is a pure function of its inputs; "now" is always passed in.

mod config;
mod packer;

use chrono::{Duration, NaiveDateTime};
use tracing::{debug, info, warn};

use crate::error::{Result, ValidationError};
use crate::schedule::{RawClassOccurrence, ScheduleResult, TaskDescriptor};
use crate::timeline::{
    eligible_tasks, group_by_day, normalize_occurrences, sort_by_priority, BusyPeriodBuilder,
    FreeSlot, FreeSlotFinder, OccurrencesByDay,
};

pub use config::{SchedulerOptions, SchedulerTuning};
pub use packer::{PackOutcome, TaskPacker};

/// Message when no task is eligible for scheduling
pub const NO_TASKS_MESSAGE: &str = "No tasks to schedule";
/// Message when the horizon has no usable free time
pub const NO_FREE_SLOTS_MESSAGE: &str = "No free time slots available in the planning horizon";

/// Study-session scheduler
#[derive(Debug, Clone, Default)]
pub struct StudyScheduler {
    options: SchedulerOptions,
}

impl StudyScheduler {
    /// Create a scheduler with the given options
    pub fn new(options: SchedulerOptions) -> Self {
        Self { options }
    }

    /// Generate study suggestions.
    ///
    /// # Arguments
    /// * `classes` - Raw class occurrences; malformed ones are ignored
    /// * `tasks` - Task list; completed and zero-length tasks are ignored
    /// * `now` - Current wall-clock instant, the first horizon day is `now.date()`
    ///
    /// # Returns
    /// A result that is unsuccessful only when nothing could be scheduled at all.
    /// Internal failures are reported the same way and never propagate.
    pub fn generate(
        &self,
        classes: &[RawClassOccurrence],
        tasks: &[TaskDescriptor],
        now: NaiveDateTime,
    ) -> ScheduleResult {
        match self.try_generate(classes, tasks, now) {
            Ok(result) => result,
            Err(err) => {
                warn!(error = %err, "schedule generation failed");
                let mut pending = eligible_tasks(tasks);
                sort_by_priority(&mut pending);
                ScheduleResult::failed(format!("Failed to generate schedule: {err}"), pending)
            }
        }
    }

    fn try_generate(
        &self,
        classes: &[RawClassOccurrence],
        tasks: &[TaskDescriptor],
        now: NaiveDateTime,
    ) -> Result<ScheduleResult> {
        self.options.validate()?;

        // 1. Eligible tasks in scheduling order
        let mut pending = eligible_tasks(tasks);
        if pending.is_empty() {
            info!(tasks = tasks.len(), "no eligible tasks to schedule");
            return Ok(ScheduleResult::failed(NO_TASKS_MESSAGE, Vec::new()));
        }
        sort_by_priority(&mut pending);

        // 2. Class occurrences by day
        let by_day = group_by_day(normalize_occurrences(classes));

        // 3. Free slots over the horizon
        let slots = collect_free_slots(&by_day, &self.options, now)?;
        if slots.is_empty() {
            info!(tasks = pending.len(), "no free slots in planning horizon");
            return Ok(ScheduleResult::failed(NO_FREE_SLOTS_MESSAGE, pending));
        }

        // 4. Pack tasks into slots
        let outcome = TaskPacker::from_options(&self.options).pack(&pending, &slots)?;

        info!(
            suggestions = outcome.suggestions.len(),
            unscheduled = outcome.unscheduled.len(),
            slots = slots.len(),
            "generated study schedule"
        );

        Ok(ScheduleResult::completed(outcome.suggestions, outcome.unscheduled))
    }
}

/// Free slots for every day of the horizon, ordered by day then start time.
///
/// Day 0 is `now.date()` and is truncated at `now`; later days use the full window.
///
/// # Errors
/// Returns a `ValidationError` when `options` are out of range.
pub fn collect_free_slots(
    by_day: &OccurrencesByDay,
    options: &SchedulerOptions,
    now: NaiveDateTime,
) -> Result<Vec<FreeSlot>> {
    options.validate()?;
    let builder = BusyPeriodBuilder::from_options(options);
    let finder = FreeSlotFinder::from_options(options);
    let today = now.date();

    let mut slots = Vec::new();
    for day_index in 0..options.days_to_schedule as usize {
        let day = today
            .checked_add_signed(Duration::days(day_index as i64))
            .ok_or_else(|| ValidationError::overflow("planning horizon"))?;

        let classes = by_day.get(&day).map(Vec::as_slice).unwrap_or(&[]);
        let busy = builder.build(classes)?;
        let current = (day == today).then_some(now);
        let day_slots = finder.find_slots(day, day_index, &busy, current)?;

        debug!(%day, busy = busy.len(), slots = day_slots.len(), "computed free slots");
        slots.extend(day_slots);
    }

    Ok(slots)
}

/// Run the scheduler once with the given options.
pub fn generate_schedule_suggestions(
    classes: &[RawClassOccurrence],
    tasks: &[TaskDescriptor],
    options: &SchedulerOptions,
    now: NaiveDateTime,
) -> ScheduleResult {
    StudyScheduler::new(options.clone()).generate(classes, tasks, now)
}
