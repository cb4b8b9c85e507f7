//! # Studyplan Core Library
//!
//! This library provides the scheduling engine behind the Studyplan student
//! organizer. Given a class timetable and a list of pending study tasks, it
//! proposes concrete study sessions in the free time around classes.
//!
//! ## Architecture
//!
//! - **Schedule**: Input and output records (class occurrences, tasks, suggestions)
//! - **Timeline**: Normalization, busy periods, free slots and task ordering
//! - **Scheduler**: The engine that ties the stages together and packs tasks
//! - **Storage**: TOML-based configuration of scheduler defaults
//!
//! ## Key Components
//!
//! - [`StudyScheduler`]: Pure, synchronous schedule generator
//! - [`SchedulerOptions`]: Per-call options with sane defaults
//! - [`Config`]: Application configuration management

pub mod error;
pub mod schedule;
pub mod scheduler;
pub mod storage;
pub mod timeline;

pub use error::{ConfigError, CoreError, ValidationError};
pub use schedule::{
    expand_weekly_classes, NormalizedOccurrence, OccurrenceTime, Priority, RawClassOccurrence,
    ScheduleResult, ScheduleSuggestion, TaskDescriptor, WeeklyClass,
};
pub use scheduler::{
    collect_free_slots, generate_schedule_suggestions, SchedulerOptions, SchedulerTuning,
    StudyScheduler, TaskPacker,
};
pub use storage::Config;
pub use timeline::{BusyKind, BusyPeriod, BusyPeriodBuilder, FreeSlot, FreeSlotFinder};
