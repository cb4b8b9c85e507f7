//! Busy-period construction for a single day of classes.
//!
//! Each class is busy time, and so is the commute around it: a buffer before
//! the first class, a buffer after the last one, and short buffers on both
//! sides of any long gap between classes.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{minutes, shift};
use crate::error::{Result, ValidationError};
use crate::scheduler::SchedulerOptions;
use crate::schedule::NormalizedOccurrence;

/// Why a period is unavailable for study
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BusyKind {
    Class,
    TravelTo,
    TravelFrom,
    TravelBetween,
    /// Result of merging periods of different kinds
    Mixed,
}

/// A `[start, end)` interval during which nobody can study.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyPeriod {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub kind: BusyKind,
}

impl BusyPeriod {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, kind: BusyKind) -> Self {
        Self { start, end, kind }
    }
}

/// Builds the merged busy-period list for one day.
#[derive(Debug, Clone)]
pub struct BusyPeriodBuilder {
    travel_before_minutes: i64,
    travel_after_minutes: i64,
    between_threshold_minutes: i64,
    between_max_minutes: i64,
    between_divisor: i32,
    merge_tolerance_minutes: i64,
}

impl BusyPeriodBuilder {
    /// Create a builder with the given travel buffers and default tuning
    pub fn new(travel_before_minutes: i64, travel_after_minutes: i64) -> Self {
        let options = SchedulerOptions {
            travel_time_before_minutes: travel_before_minutes,
            travel_time_after_minutes: travel_after_minutes,
            ..SchedulerOptions::default()
        };
        Self::from_options(&options)
    }

    /// Create from scheduler options
    pub fn from_options(options: &SchedulerOptions) -> Self {
        let tuning = &options.tuning;
        Self {
            travel_before_minutes: options.travel_time_before_minutes,
            travel_after_minutes: options.travel_time_after_minutes,
            between_threshold_minutes: tuning.travel_between_threshold_minutes,
            between_max_minutes: tuning.travel_between_max_minutes,
            between_divisor: tuning.travel_between_divisor,
            merge_tolerance_minutes: tuning.merge_tolerance_minutes,
        }
    }

    /// Build merged busy periods from one day's classes.
    ///
    /// # Arguments
    /// * `classes` - The day's class occurrences, sorted by start
    ///
    /// # Returns
    /// Non-overlapping busy periods sorted by start; empty when there are no classes
    ///
    /// # Errors
    /// Returns a `ValidationError` when a buffer or tuning value is out of range.
    pub fn build(&self, classes: &[NormalizedOccurrence]) -> Result<Vec<BusyPeriod>> {
        let (Some(first), Some(last_end)) = (
            classes.iter().map(|c| c.start).min(),
            classes.iter().map(|c| c.end).max(),
        ) else {
            return Ok(Vec::new());
        };

        let travel_before = minutes(self.travel_before_minutes, "travel_time_before_minutes")?;
        let travel_after = minutes(self.travel_after_minutes, "travel_time_after_minutes")?;
        let between_threshold = minutes(
            self.between_threshold_minutes,
            "tuning.travel_between_threshold_minutes",
        )?;
        let between_max = minutes(self.between_max_minutes, "tuning.travel_between_max_minutes")?;
        if self.between_divisor <= 0 {
            return Err(ValidationError::invalid_value(
                "tuning.travel_between_divisor",
                "must be positive",
            )
            .into());
        }

        let mut periods = Vec::with_capacity(classes.len() * 3 + 2);

        // 1. Commute to the first class
        periods.push(BusyPeriod::new(
            shift(first, -travel_before, "travel before first class")?,
            first,
            BusyKind::TravelTo,
        ));

        // 2. The classes themselves
        periods.extend(
            classes
                .iter()
                .map(|c| BusyPeriod::new(c.start, c.end, BusyKind::Class)),
        );

        // 3. Commute home after the last class
        periods.push(BusyPeriod::new(
            last_end,
            shift(last_end, travel_after, "travel after last class")?,
            BusyKind::TravelFrom,
        ));

        // 4. Short commutes around long gaps between classes.
        // Gaps are measured from the latest end so far, so a class nested
        // inside a longer one does not open a gap.
        let mut ordered: Vec<&NormalizedOccurrence> = classes.iter().collect();
        ordered.sort_by_key(|c| (c.start, c.end));

        let mut covered_until = ordered[0].end;
        for class in &ordered[1..] {
            if class.start > covered_until {
                let gap = class.start - covered_until;
                if gap > between_threshold {
                    let travel = (gap / self.between_divisor).min(between_max);
                    periods.push(BusyPeriod::new(
                        covered_until,
                        shift(covered_until, travel, "travel between classes")?,
                        BusyKind::TravelBetween,
                    ));
                    periods.push(BusyPeriod::new(
                        shift(class.start, -travel, "travel between classes")?,
                        class.start,
                        BusyKind::TravelBetween,
                    ));
                }
            }
            covered_until = covered_until.max(class.end);
        }

        let merge_tolerance = minutes(self.merge_tolerance_minutes, "tuning.merge_tolerance_minutes")?;
        let merged = merge_periods(periods, merge_tolerance);
        debug!(classes = classes.len(), busy_periods = merged.len(), "built busy periods");
        Ok(merged)
    }
}

impl Default for BusyPeriodBuilder {
    fn default() -> Self {
        Self::from_options(&SchedulerOptions::default())
    }
}

/// Sort and merge busy periods.
///
/// Zero-width periods are discarded. A period starting no later than
/// `tolerance` after the previous one ends is folded into it; folding
/// periods of different kinds yields `BusyKind::Mixed`.
pub fn merge_periods(mut periods: Vec<BusyPeriod>, tolerance: Duration) -> Vec<BusyPeriod> {
    periods.retain(|p| p.start < p.end);
    periods.sort_by_key(|p| (p.start, p.end));

    let mut merged: Vec<BusyPeriod> = Vec::with_capacity(periods.len());
    for period in periods {
        match merged.last_mut() {
            Some(prev) if period.start - prev.end <= tolerance => {
                if period.end > prev.end {
                    prev.end = period.end;
                }
                if period.kind != prev.kind {
                    prev.kind = BusyKind::Mixed;
                }
            }
            _ => merged.push(period),
        }
    }

    merged
}
