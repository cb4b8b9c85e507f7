//! Scheduler options and tuning constants.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::timeline::minutes;

/// Heuristic constants of the engine.
///
/// The defaults are the values the planner has always used; change them only
/// with evidence that other values schedule better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerTuning {
    /// Busy periods closer than this are merged (minutes)
    #[serde(default = "default_merge_tolerance")]
    pub merge_tolerance_minutes: i64,
    /// Gap between classes above which travel-between buffers are inserted (minutes)
    #[serde(default = "default_travel_between_threshold")]
    pub travel_between_threshold_minutes: i64,
    /// Upper bound of each travel-between buffer (minutes)
    #[serde(default = "default_travel_between_max")]
    pub travel_between_max_minutes: i64,
    /// Each travel-between buffer is at most `gap / divisor`
    #[serde(default = "default_travel_between_divisor")]
    pub travel_between_divisor: i32,
    /// Mandatory break after every study block (minutes)
    #[serde(default = "default_min_break")]
    pub min_break_minutes: i64,
    /// Max tasks packed back-to-back into one free slot
    #[serde(default = "default_max_consecutive")]
    pub max_consecutive_tasks: usize,
    /// Lead time before the first suggestion of today (minutes)
    #[serde(default = "default_present_buffer")]
    pub present_buffer_minutes: i64,
}

/// Per-call scheduling options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerOptions {
    /// Travel buffer before the first class of a day (minutes)
    #[serde(default = "default_travel_time")]
    pub travel_time_before_minutes: i64,
    /// Travel buffer after the last class of a day (minutes)
    #[serde(default = "default_travel_time")]
    pub travel_time_after_minutes: i64,
    /// Planning horizon, starting today (days)
    #[serde(default = "default_days_to_schedule")]
    pub days_to_schedule: u32,
    /// Shortest free slot worth scheduling into (minutes)
    #[serde(default = "default_min_free_time_block")]
    pub min_free_time_block_minutes: i64,
    /// Daily study cap (hours)
    #[serde(default = "default_max_daily_study_hours")]
    pub max_daily_study_hours: f64,
    #[serde(default)]
    pub tuning: SchedulerTuning,
}

// Default functions
fn default_merge_tolerance() -> i64 {
    1
}
fn default_travel_between_threshold() -> i64 {
    30
}
fn default_travel_between_max() -> i64 {
    30
}
fn default_travel_between_divisor() -> i32 {
    3
}
fn default_min_break() -> i64 {
    15
}
fn default_max_consecutive() -> usize {
    2
}
fn default_present_buffer() -> i64 {
    15
}
fn default_travel_time() -> i64 {
    120
}
fn default_days_to_schedule() -> u32 {
    7
}
fn default_min_free_time_block() -> i64 {
    30
}
fn default_max_daily_study_hours() -> f64 {
    5.0
}

impl Default for SchedulerTuning {
    fn default() -> Self {
        Self {
            merge_tolerance_minutes: default_merge_tolerance(),
            travel_between_threshold_minutes: default_travel_between_threshold(),
            travel_between_max_minutes: default_travel_between_max(),
            travel_between_divisor: default_travel_between_divisor(),
            min_break_minutes: default_min_break(),
            max_consecutive_tasks: default_max_consecutive(),
            present_buffer_minutes: default_present_buffer(),
        }
    }
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            travel_time_before_minutes: default_travel_time(),
            travel_time_after_minutes: default_travel_time(),
            days_to_schedule: default_days_to_schedule(),
            min_free_time_block_minutes: default_min_free_time_block(),
            max_daily_study_hours: default_max_daily_study_hours(),
            tuning: SchedulerTuning::default(),
        }
    }
}

/// Largest accepted value for any minute-valued option (one year).
const MAX_MINUTES: i64 = 366 * 24 * 60;

fn check_minutes(field: &str, value: i64, allow_zero: bool) -> Result<()> {
    let lower_ok = if allow_zero { value >= 0 } else { value > 0 };
    if !lower_ok || value > MAX_MINUTES {
        let bound = if allow_zero { "non-negative" } else { "positive" };
        return Err(ValidationError::invalid_value(
            field,
            format!("must be {bound} and at most {MAX_MINUTES} minutes, got {value}"),
        )
        .into());
    }
    Ok(())
}

impl SchedulerTuning {
    pub fn validate(&self) -> Result<()> {
        check_minutes("tuning.merge_tolerance_minutes", self.merge_tolerance_minutes, true)?;
        check_minutes(
            "tuning.travel_between_threshold_minutes",
            self.travel_between_threshold_minutes,
            true,
        )?;
        check_minutes(
            "tuning.travel_between_max_minutes",
            self.travel_between_max_minutes,
            true,
        )?;
        check_minutes("tuning.min_break_minutes", self.min_break_minutes, true)?;
        check_minutes("tuning.present_buffer_minutes", self.present_buffer_minutes, true)?;

        if self.travel_between_divisor <= 0 {
            return Err(ValidationError::invalid_value(
                "tuning.travel_between_divisor",
                "must be positive",
            )
            .into());
        }
        if self.max_consecutive_tasks == 0 {
            return Err(ValidationError::invalid_value(
                "tuning.max_consecutive_tasks",
                "must be at least 1",
            )
            .into());
        }
        Ok(())
    }

    pub fn merge_tolerance(&self) -> Result<Duration> {
        minutes(self.merge_tolerance_minutes, "tuning.merge_tolerance_minutes")
    }

    pub fn min_break(&self) -> Result<Duration> {
        minutes(self.min_break_minutes, "tuning.min_break_minutes")
    }

    pub fn present_buffer(&self) -> Result<Duration> {
        minutes(self.present_buffer_minutes, "tuning.present_buffer_minutes")
    }
}

impl SchedulerOptions {
    /// Check every option is in range.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidValue` naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        check_minutes("travel_time_before_minutes", self.travel_time_before_minutes, true)?;
        check_minutes("travel_time_after_minutes", self.travel_time_after_minutes, true)?;
        check_minutes("min_free_time_block_minutes", self.min_free_time_block_minutes, false)?;

        if self.days_to_schedule == 0 || self.days_to_schedule > 366 {
            return Err(ValidationError::invalid_value(
                "days_to_schedule",
                format!("must be between 1 and 366, got {}", self.days_to_schedule),
            )
            .into());
        }
        if !self.max_daily_study_hours.is_finite()
            || self.max_daily_study_hours <= 0.0
            || self.max_daily_study_hours > 24.0
        {
            return Err(ValidationError::invalid_value(
                "max_daily_study_hours",
                format!("must be in (0, 24], got {}", self.max_daily_study_hours),
            )
            .into());
        }

        self.tuning.validate()
    }

    /// Daily study cap as a duration.
    pub fn daily_cap(&self) -> Result<Duration> {
        let seconds = (self.max_daily_study_hours * 3600.0).round();
        if !seconds.is_finite() {
            return Err(ValidationError::overflow("max_daily_study_hours").into());
        }
        Duration::try_seconds(seconds as i64)
            .ok_or_else(|| ValidationError::overflow("max_daily_study_hours").into())
    }

    pub fn min_free_time_block(&self) -> Result<Duration> {
        minutes(self.min_free_time_block_minutes, "min_free_time_block_minutes")
    }
}
