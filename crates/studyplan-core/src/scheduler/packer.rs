//! Greedy packing of prioritized tasks into free slots.
//!
//! The first pass walks slots in day/time order and fills each with the most
//! urgent tasks that fit, at most `max_consecutive_tasks` per slot. The second
//! pass gives every slot that still has room one more chance to take a
//! leftover task. Both passes honour the daily study cap and keep a break
//! after every placed task.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use tracing::debug;

use super::config::SchedulerOptions;
use crate::error::{Result, ValidationError};
use crate::schedule::{ScheduleSuggestion, TaskDescriptor};
use crate::timeline::{shift, FreeSlot};

/// Suggestions in start order plus the tasks that found no room.
#[derive(Debug, Clone, Default)]
pub struct PackOutcome {
    pub suggestions: Vec<ScheduleSuggestion>,
    pub unscheduled: Vec<TaskDescriptor>,
}

#[derive(Debug, Clone, Copy)]
struct SlotState {
    /// Earliest start for the next task in this slot
    cursor: NaiveDateTime,
    packed: usize,
}

/// Per-day bookkeeping: minutes used and blocks placed.
#[derive(Debug, Default)]
struct DayLedger {
    used: Duration,
    blocks: Vec<(NaiveDateTime, NaiveDateTime)>,
}

impl DayLedger {
    /// `[start, end)` plus its trailing break clears every placed block and its break.
    fn is_clear(&self, start: NaiveDateTime, end: NaiveDateTime, gap: Duration) -> bool {
        let padded = |at: NaiveDateTime| at.checked_add_signed(gap).unwrap_or(NaiveDateTime::MAX);
        self.blocks
            .iter()
            .all(|&(s, e)| padded(end) <= s || padded(e) <= start)
    }

    fn latest_end(&self) -> Option<NaiveDateTime> {
        self.blocks.iter().map(|&(_, e)| e).max()
    }
}

/// Two-pass greedy task packer.
#[derive(Debug, Clone)]
pub struct TaskPacker {
    options: SchedulerOptions,
}

impl TaskPacker {
    /// Create from scheduler options
    pub fn from_options(options: &SchedulerOptions) -> Self {
        Self {
            options: options.clone(),
        }
    }

    /// Pack tasks into slots.
    ///
    /// # Arguments
    /// * `tasks` - Eligible tasks in scheduling order
    /// * `slots` - Free slots ordered by day, then start time
    ///
    /// # Returns
    /// Suggestions sorted by start time and the unplaced tasks in scheduling order
    pub fn pack(&self, tasks: &[TaskDescriptor], slots: &[FreeSlot]) -> Result<PackOutcome> {
        let daily_cap = self.options.daily_cap()?;
        let min_break = self.options.tuning.min_break()?;
        let max_consecutive = self.options.tuning.max_consecutive_tasks;

        let lengths: Vec<Option<Duration>> = tasks
            .iter()
            .map(|t| Duration::try_minutes(t.estimated_time_minutes))
            .collect();
        let mut scheduled = vec![false; tasks.len()];
        let mut days: HashMap<NaiveDate, DayLedger> = HashMap::new();
        let mut states: Vec<SlotState> = slots
            .iter()
            .map(|s| SlotState { cursor: s.start, packed: 0 })
            .collect();
        let mut suggestions = Vec::new();

        // First pass: fill slots in order
        for (slot, state) in slots.iter().zip(states.iter_mut()) {
            let ledger = days.entry(slot.day).or_default();
            if ledger.used >= daily_cap {
                continue;
            }

            // Keep the break after a block placed in an earlier slot today
            if let Some(previous_end) = ledger.latest_end() {
                let earliest = shift(previous_end, min_break, "break after previous slot")?;
                state.cursor = state.cursor.max(earliest);
            }
            if state.cursor >= slot.end {
                continue;
            }

            let mut available = (slot.end - state.cursor).min(daily_cap - ledger.used);

            for (idx, task) in tasks.iter().enumerate() {
                if scheduled[idx] {
                    continue;
                }
                let Some(length) = lengths[idx] else { continue };
                if length > available {
                    continue;
                }

                let end = shift(state.cursor, length, "task end")?;
                suggestions.push(suggestion(task, state.cursor, end, slot.day));
                ledger.blocks.push((state.cursor, end));
                ledger.used = ledger.used + length;
                scheduled[idx] = true;

                let step = length
                    .checked_add(&min_break)
                    .ok_or_else(|| ValidationError::overflow("slot cursor"))?;
                state.cursor = shift(state.cursor, step, "slot cursor")?;
                state.packed += 1;
                available = available - step;

                if available < min_break || state.packed >= max_consecutive {
                    break;
                }
            }
        }

        let first_pass = suggestions.len();
        debug!(placed = first_pass, slots = slots.len(), "first packing pass done");

        // Second pass: at most one more task per slot that still has room
        for (slot, state) in slots.iter().zip(states.iter_mut()) {
            if scheduled.iter().all(|done| *done) {
                break;
            }
            if state.packed >= max_consecutive || state.cursor >= slot.end {
                continue;
            }

            let ledger = days.entry(slot.day).or_default();
            if ledger.used >= daily_cap {
                continue;
            }
            let remaining = (slot.end - state.cursor).min(daily_cap - ledger.used);

            let start = state.cursor;
            let candidate = tasks.iter().enumerate().find_map(|(idx, _)| {
                if scheduled[idx] {
                    return None;
                }
                let length = lengths[idx].filter(|l| *l <= remaining)?;
                let end = start.checked_add_signed(length)?;
                ledger
                    .is_clear(start, end, min_break)
                    .then_some((idx, length, end))
            });

            if let Some((idx, length, end)) = candidate {
                suggestions.push(suggestion(&tasks[idx], start, end, slot.day));
                ledger.blocks.push((start, end));
                ledger.used = ledger.used + length;
                scheduled[idx] = true;
                state.cursor = shift(end, min_break, "slot cursor")?;
                state.packed += 1;
            }
        }

        debug!(placed = suggestions.len() - first_pass, "relaxed packing pass done");

        suggestions.sort_by_key(|s| s.start_time);
        let unscheduled = tasks
            .iter()
            .zip(&scheduled)
            .filter(|(_, done)| !**done)
            .map(|(task, _)| task.clone())
            .collect();

        Ok(PackOutcome {
            suggestions,
            unscheduled,
        })
    }
}

impl Default for TaskPacker {
    fn default() -> Self {
        Self::from_options(&SchedulerOptions::default())
    }
}

fn suggestion(
    task: &TaskDescriptor,
    start: NaiveDateTime,
    end: NaiveDateTime,
    day: NaiveDate,
) -> ScheduleSuggestion {
    ScheduleSuggestion {
        task_id: task.id.clone(),
        title: task.title.clone(),
        start_time: start,
        end_time: end,
        duration_minutes: task.estimated_time_minutes,
        subject: task.subject.clone(),
        priority: task.priority,
        day_key: day,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::Priority;

    fn day(offset: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19 + offset).unwrap()
    }

    fn at(offset: u32, hour: u32, minute: u32) -> NaiveDateTime {
        day(offset).and_hms_opt(hour, minute, 0).unwrap()
    }

    fn slot(offset: u32, from: (u32, u32), to: (u32, u32)) -> FreeSlot {
        FreeSlot::new(
            at(offset, from.0, from.1),
            at(offset, to.0, to.1),
            day(offset),
            offset as usize,
        )
    }

    fn packer(hours: f64) -> TaskPacker {
        TaskPacker::from_options(&SchedulerOptions {
            max_daily_study_hours: hours,
            ..SchedulerOptions::default()
        })
    }

    #[test]
    fn test_packs_with_breaks() {
        let tasks = vec![
            TaskDescriptor::new("a", "A", 60),
            TaskDescriptor::new("b", "B", 30),
        ];
        let slots = vec![slot(0, (14, 0), (22, 0))];

        let outcome = packer(5.0).pack(&tasks, &slots).unwrap();

        assert_eq!(outcome.suggestions.len(), 2);
        assert_eq!(outcome.suggestions[0].start_time, at(0, 14, 0));
        assert_eq!(outcome.suggestions[0].end_time, at(0, 15, 0));
        assert_eq!(outcome.suggestions[1].start_time, at(0, 15, 15));
        assert_eq!(outcome.suggestions[1].end_time, at(0, 15, 45));
        assert!(outcome.unscheduled.is_empty());
    }

    #[test]
    fn test_max_consecutive_spreads_tasks() {
        let tasks: Vec<_> = (0..3)
            .map(|i| TaskDescriptor::new(format!("t{i}"), "Task", 30))
            .collect();
        let slots = vec![slot(0, (6, 0), (12, 0)), slot(1, (6, 0), (12, 0))];

        let outcome = packer(5.0).pack(&tasks, &slots).unwrap();

        assert_eq!(outcome.suggestions.len(), 3);
        let first_day = outcome.suggestions.iter().filter(|s| s.day_key == day(0)).count();
        assert_eq!(first_day, 2);
        assert_eq!(outcome.suggestions[2].day_key, day(1));
    }

    #[test]
    fn test_daily_cap_limits_each_day() {
        let tasks: Vec<_> = (0..5)
            .map(|i| TaskDescriptor::new(format!("t{i}"), "Task", 90))
            .collect();
        let slots = vec![
            slot(0, (6, 0), (8, 0)),
            slot(0, (14, 0), (22, 0)),
            slot(1, (6, 0), (22, 0)),
            slot(2, (6, 0), (22, 0)),
        ];

        let outcome = packer(2.0).pack(&tasks, &slots).unwrap();

        assert_eq!(outcome.suggestions.len(), 3);
        for offset in 0..3 {
            let count = outcome
                .suggestions
                .iter()
                .filter(|s| s.day_key == day(offset))
                .count();
            assert_eq!(count, 1);
        }
        assert_eq!(outcome.unscheduled.len(), 2);
    }

    #[test]
    fn test_high_priority_wins_contended_slot() {
        let tasks = vec![
            TaskDescriptor::new("high", "High", 45).with_priority(Priority::High),
            TaskDescriptor::new("low", "Low", 45).with_priority(Priority::Low),
        ];
        let slots = vec![slot(0, (9, 0), (10, 0))];

        let outcome = packer(5.0).pack(&tasks, &slots).unwrap();

        assert_eq!(outcome.suggestions.len(), 1);
        assert_eq!(outcome.suggestions[0].task_id, "high");
        assert_eq!(outcome.unscheduled[0].id, "low");
    }

    #[test]
    fn test_second_pass_fills_leftover_room() {
        let tasks = vec![
            TaskDescriptor::new("big", "Big", 60).with_priority(Priority::High),
            TaskDescriptor::new("tiny", "Tiny", 10).with_priority(Priority::Low),
        ];
        // After "big" and its break only 12 minutes remain, below the break
        // length, so the first pass stops filling the slot.
        let slots = vec![slot(0, (6, 0), (7, 27))];

        let outcome = packer(5.0).pack(&tasks, &slots).unwrap();

        let ids: Vec<_> = outcome.suggestions.iter().map(|s| s.task_id.as_str()).collect();
        assert_eq!(ids, vec!["big", "tiny"]);
        assert_eq!(outcome.suggestions[1].start_time, at(0, 7, 15));
        assert_eq!(outcome.suggestions[1].end_time, at(0, 7, 25));
        assert!(outcome.unscheduled.is_empty());
    }

    #[test]
    fn test_oversized_task_is_unscheduled() {
        let tasks = vec![TaskDescriptor::new("huge", "Huge", i64::MAX)];
        let slots = vec![slot(0, (6, 0), (22, 0))];

        let outcome = packer(5.0).pack(&tasks, &slots).unwrap();

        assert!(outcome.suggestions.is_empty());
        assert_eq!(outcome.unscheduled.len(), 1);
    }

    #[test]
    fn test_break_kept_across_adjacent_slots() {
        let tasks = vec![
            TaskDescriptor::new("a", "A", 60),
            TaskDescriptor::new("b", "B", 60),
        ];
        // Slots separated by a five minute class
        let slots = vec![slot(0, (9, 0), (10, 0)), slot(0, (10, 5), (11, 30))];

        let outcome = packer(5.0).pack(&tasks, &slots).unwrap();

        assert_eq!(outcome.suggestions.len(), 2);
        assert_eq!(outcome.suggestions[1].start_time, at(0, 10, 15));
    }

    #[test]
    fn test_out_of_range_break_is_an_error() {
        let mut options = SchedulerOptions::default();
        options.tuning.min_break_minutes = i64::MAX;
        let tasks = vec![TaskDescriptor::new("a", "A", 30)];
        let slots = vec![slot(0, (6, 0), (8, 0))];

        assert!(TaskPacker::from_options(&options).pack(&tasks, &slots).is_err());
    }
}
