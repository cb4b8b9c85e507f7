//! Parsing helpers for the loose date/time strings found in class and task
//! records.
//!
//! Instants are wall-clock `NaiveDateTime` values. RFC 3339 strings are read
//! at the wall-clock time of their own offset.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};
use tracing::debug;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a 24-hour `"HH:MM"` time of day.
///
/// Returns `None` for anything else, including out-of-range components.
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let parts: Vec<&str> = value.trim().split(':').collect();
    if parts.len() != 2 {
        return None;
    }

    let hour: u32 = parts[0].parse().ok()?;
    let minute: u32 = parts[1].parse().ok()?;

    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Parse an absolute instant from RFC 3339 or a naive ISO datetime.
pub fn parse_instant(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Parse a calendar day. Full datetimes are accepted and truncated to their date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_instant(value).map(|dt| dt.date()))
}

/// A scalar field as it may appear in loosely typed task records.
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseScalar {
    Integer(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Serde adapter for optional instants in any format `parse_instant` accepts.
///
/// Unreadable values become `None` so one bad record does not reject its
/// whole batch.
pub fn deserialize_optional_instant<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match LooseScalar::deserialize(deserializer)? {
        LooseScalar::Text(s) if s.trim().is_empty() => None,
        LooseScalar::Text(s) => {
            let instant = parse_instant(&s);
            if instant.is_none() {
                debug!(value = %s, "ignoring unreadable datetime");
            }
            instant
        }
        LooseScalar::Other(_) => None,
        LooseScalar::Integer(n) => {
            debug!(value = n, "ignoring non-text datetime");
            None
        }
        LooseScalar::Float(n) => {
            debug!(value = n, "ignoring non-text datetime");
            None
        }
    };
    Ok(parsed)
}

/// Serde adapter for minute counts.
///
/// Fractional minutes round up and numeric strings are accepted. Anything
/// else reads as `0`, which makes the record ineligible instead of failing.
pub fn deserialize_minutes<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let from_float = |n: f64| if n.is_nan() { 0 } else { n.ceil() as i64 };

    let minutes = match LooseScalar::deserialize(deserializer)? {
        LooseScalar::Integer(n) => n,
        LooseScalar::Float(n) => from_float(n),
        LooseScalar::Text(s) => match s.trim().parse::<f64>() {
            Ok(n) => from_float(n),
            Err(_) => {
                debug!(value = %s, "ignoring unreadable minute count");
                0
            }
        },
        LooseScalar::Other(_) => 0,
    };
    Ok(minutes)
}
