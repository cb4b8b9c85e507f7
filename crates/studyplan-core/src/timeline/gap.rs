//! Free-slot detection inside the daily working window.
//!
//! Finds the time between busy periods that is long enough to study in.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::busy::BusyPeriod;
use super::{minutes, shift};
use crate::error::{Result, ValidationError};
use crate::scheduler::SchedulerOptions;

/// Hour the working window opens
pub const DAY_START_HOUR: u32 = 6;
/// Hour the working window closes
pub const DAY_END_HOUR: u32 = 22;

/// Working window `[06:00, 22:00)` of a day.
pub fn day_window(day: NaiveDate) -> Result<(NaiveDateTime, NaiveDateTime)> {
    let start = day.and_hms_opt(DAY_START_HOUR, 0, 0);
    let end = day.and_hms_opt(DAY_END_HOUR, 0, 0);
    match (start, end) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(ValidationError::overflow("day window").into()),
    }
}

/// A free interval on one day of the planning horizon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeSlot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub duration_minutes: i64,
    pub day: NaiveDate,
    /// Offset of `day` from the first day of the horizon
    pub day_index: usize,
}

impl FreeSlot {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, day: NaiveDate, day_index: usize) -> Self {
        Self {
            start,
            end,
            duration_minutes: (end - start).num_minutes(),
            day,
            day_index,
        }
    }

    /// Check if `[start, end)` lies inside this slot
    pub fn contains(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start <= start && end <= self.end
    }
}

/// Finder for free slots in one day
#[derive(Debug, Clone)]
pub struct FreeSlotFinder {
    /// Shortest slot worth reporting (minutes)
    min_block_minutes: i64,
    /// Lead time added to "now" on the current day (minutes)
    present_buffer_minutes: i64,
}

impl FreeSlotFinder {
    /// Create a finder with the given minimum block (minutes)
    pub fn new(min_block_minutes: i64) -> Self {
        Self {
            min_block_minutes,
            present_buffer_minutes: SchedulerOptions::default().tuning.present_buffer_minutes,
        }
    }

    /// Create from scheduler options
    pub fn from_options(options: &SchedulerOptions) -> Self {
        Self {
            min_block_minutes: options.min_free_time_block_minutes,
            present_buffer_minutes: options.tuning.present_buffer_minutes,
        }
    }

    /// Find free slots on one day.
    ///
    /// # Arguments
    /// * `day` - The calendar day
    /// * `day_index` - Offset of `day` within the horizon
    /// * `busy` - Merged busy periods of the day, sorted by start
    /// * `now` - Current instant when `day` is today, `None` otherwise
    ///
    /// # Returns
    /// Slots of at least the minimum block, sorted by start time
    pub fn find_slots(
        &self,
        day: NaiveDate,
        day_index: usize,
        busy: &[BusyPeriod],
        now: Option<NaiveDateTime>,
    ) -> Result<Vec<FreeSlot>> {
        let (mut day_start, day_end) = day_window(day)?;
        let min_block = minutes(self.min_block_minutes, "min_free_time_block_minutes")?;

        if let Some(now) = now {
            if now >= day_end {
                return Ok(Vec::new());
            }
            // Nothing earlier than the present plus its buffer
            let buffer = minutes(self.present_buffer_minutes, "tuning.present_buffer_minutes")?;
            let earliest = shift(now, buffer, "present-time buffer")?;
            if earliest > day_start {
                day_start = earliest;
            }
        }

        let mut candidates = Vec::new();
        let mut last_end = day_start;

        for period in busy {
            // Skip periods that end before our current position
            if period.end <= last_end {
                continue;
            }

            // Nothing after the window matters
            if period.start >= day_end {
                break;
            }

            if period.start > last_end {
                candidates.push((last_end, period.start));
            }

            last_end = period.end.min(day_end);
        }

        // Tail of the window after the last busy period
        if last_end < day_end {
            candidates.push((last_end, day_end));
        }

        Ok(candidates
            .into_iter()
            .filter(|(start, end)| *end - *start >= min_block)
            .filter(|(_, end)| now.map_or(true, |now| *end > now))
            .map(|(start, end)| FreeSlot::new(start, end, day, day_index))
            .collect())
    }
}

impl Default for FreeSlotFinder {
    fn default() -> Self {
        Self::from_options(&SchedulerOptions::default())
    }
}
