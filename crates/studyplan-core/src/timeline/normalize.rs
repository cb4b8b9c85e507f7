//! Class occurrence normalization.
//!
//! Turns raw class records into absolute `[start, end)` intervals grouped by
//! calendar day. Records that cannot be resolved are dropped.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::schedule::time::{parse_date, parse_instant, parse_time_of_day};
use crate::schedule::{NormalizedOccurrence, OccurrenceTime, RawClassOccurrence};

/// Class occurrences keyed by calendar day, each day sorted by start.
pub type OccurrencesByDay = BTreeMap<NaiveDate, Vec<NormalizedOccurrence>>;

enum Endpoint {
    Instant(NaiveDateTime),
    TimeOfDay(NaiveTime),
}

impl Endpoint {
    fn parse(time: Option<&str>, date_time: Option<&str>) -> Option<Self> {
        if let Some(raw) = time {
            if let Some(t) = parse_time_of_day(raw) {
                return Some(Endpoint::TimeOfDay(t));
            }
            if let Some(dt) = parse_instant(raw) {
                return Some(Endpoint::Instant(dt));
            }
        }
        date_time.and_then(parse_instant).map(Endpoint::Instant)
    }

    fn on(self, date: Option<NaiveDate>) -> Option<NaiveDateTime> {
        match self {
            Endpoint::Instant(dt) => Some(dt),
            Endpoint::TimeOfDay(t) => date.map(|d| d.and_time(t)),
        }
    }
}

/// Classify a raw record into its time representation.
pub fn ingest(raw: &RawClassOccurrence) -> Option<OccurrenceTime> {
    let date = raw.date.as_deref().and_then(parse_date);
    let start = Endpoint::parse(raw.start_time.as_deref(), raw.start_date_time.as_deref())?;
    let end = Endpoint::parse(raw.end_time.as_deref(), raw.end_date_time.as_deref())?;

    match (start, end) {
        (Endpoint::TimeOfDay(start), Endpoint::TimeOfDay(end)) => Some(OccurrenceTime::DayAndTime {
            date: date?,
            start,
            end,
        }),
        (start, end) => Some(OccurrenceTime::Absolute {
            start: start.on(date)?,
            end: end.on(date)?,
        }),
    }
}

/// Resolve one raw record, or `None` if it carries no usable interval.
pub fn normalize_occurrence(raw: &RawClassOccurrence) -> Option<NormalizedOccurrence> {
    let (start, end) = ingest(raw)?.resolve();
    if start >= end {
        return None;
    }

    Some(NormalizedOccurrence {
        start,
        end,
        subject: raw.subject.clone(),
        title: raw.title.clone(),
    })
}

/// Normalize all records, silently skipping malformed ones.
pub fn normalize_occurrences(raw: &[RawClassOccurrence]) -> Vec<NormalizedOccurrence> {
    let normalized: Vec<_> = raw.iter().filter_map(normalize_occurrence).collect();

    let dropped = raw.len() - normalized.len();
    if dropped > 0 {
        debug!(dropped, kept = normalized.len(), "dropped malformed class occurrences");
    }

    normalized
}

/// Group occurrences by the calendar day they start on.
pub fn group_by_day(occurrences: Vec<NormalizedOccurrence>) -> OccurrencesByDay {
    let mut days: OccurrencesByDay = BTreeMap::new();
    for occurrence in occurrences {
        days.entry(occurrence.day()).or_default().push(occurrence);
    }

    for list in days.values_mut() {
        list.sort_by_key(|o| o.start);
    }

    days
}
