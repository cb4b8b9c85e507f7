//! Weekly class timetables expanded into dated occurrences.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::RawClassOccurrence;

/// A class that meets on the same weekday every week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyClass {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    pub weekday: u8, // 0=Mon ... 6=Sun
    pub start_time: String, // HH:mm
    pub end_time: String,   // HH:mm
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Expand weekly classes into one occurrence per matching day of the horizon.
///
/// Times are copied through unparsed; the normalizer drops malformed ones.
pub fn expand_weekly_classes(
    classes: &[WeeklyClass],
    first_day: NaiveDate,
    days: u32,
) -> Vec<RawClassOccurrence> {
    let mut occurrences = Vec::new();

    for offset in 0..days {
        let Some(day) = first_day.checked_add_signed(Duration::days(i64::from(offset))) else {
            break;
        };
        let weekday = day.weekday().num_days_from_monday() as u8;

        for class in classes.iter().filter(|c| c.enabled && c.weekday == weekday) {
            occurrences.push(RawClassOccurrence {
                date: Some(day.format("%Y-%m-%d").to_string()),
                start_time: Some(class.start_time.clone()),
                end_time: Some(class.end_time.clone()),
                subject: class.subject.clone(),
                title: class.title.clone(),
                ..RawClassOccurrence::default()
            });
        }
    }

    occurrences
}
