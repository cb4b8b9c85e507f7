//! Timeline stages of the study planner.
//!
//! This module provides:
//! - Class occurrence normalization and grouping by day
//! - Busy-period construction with travel buffers
//! - Free-slot detection inside the daily working window
//! - Task eligibility and priority ordering

mod busy;
mod gap;
mod normalize;
mod priority;

use chrono::{Duration, NaiveDateTime};

use crate::error::{Result, ValidationError};

pub use busy::{merge_periods, BusyKind, BusyPeriod, BusyPeriodBuilder};
pub use gap::{day_window, FreeSlot, FreeSlotFinder, DAY_END_HOUR, DAY_START_HOUR};
pub use normalize::{group_by_day, ingest, normalize_occurrence, normalize_occurrences, OccurrencesByDay};
pub use priority::{compare_tasks, eligible_tasks, sort_by_priority};

/// Offset an instant, reporting overflow instead of panicking.
pub(crate) fn shift(at: NaiveDateTime, by: Duration, context: &str) -> Result<NaiveDateTime> {
    at.checked_add_signed(by)
        .ok_or_else(|| ValidationError::overflow(context).into())
}

/// Minutes as a duration, reporting out-of-range values instead of panicking.
pub(crate) fn minutes(value: i64, context: &str) -> Result<Duration> {
    Duration::try_minutes(value).ok_or_else(|| ValidationError::overflow(context).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn test_minutes_out_of_range_is_an_error() {
        assert_eq!(minutes(90, "block").unwrap(), Duration::minutes(90));
        assert!(matches!(
            minutes(i64::MAX, "block"),
            Err(CoreError::Validation(ValidationError::TimeOverflow { .. }))
        ));
    }
}
