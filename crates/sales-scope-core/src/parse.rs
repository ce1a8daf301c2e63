//! Lenient field parsing.
//!
//! Every typed view of a record cell lives here so filtering, sorting, and
//! facet aggregation agree on what a malformed value means. The rules are
//! forgiving on purpose: a cell that cannot be parsed maps to a fixed
//! fallback instead of an error, because one bad row must never take a whole
//! query down with it.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Datetime layouts accepted for the `Date` column, tried in order after
/// RFC 3339. Naive values are taken as UTC.
const DATETIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Date-only layouts, interpreted as midnight UTC.
const DATE_LAYOUTS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parse the `Date` column into a UTC instant.
///
/// Returns `None` for empty or unrecognized values. `None` orders before
/// every real date, so date-sorted output puts undated records first in
/// ascending order and last in descending order; an active date filter
/// excludes them entirely.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(instant.with_timezone(&Utc));
    }
    for layout in DATETIME_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, layout) {
            return Some(naive.and_utc());
        }
    }
    for layout in DATE_LAYOUTS {
        if let Ok(day) = NaiveDate::parse_from_str(trimmed, layout) {
            return day.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }
    None
}

/// Widen an instant to the last millisecond of its calendar day.
///
/// Used on upper date bounds so a day-granular `dateEnd` includes the whole
/// day it names.
pub fn end_of_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant
        .date_naive()
        .and_hms_milli_opt(23, 59, 59, 999)
        .map(|naive| naive.and_utc())
        .unwrap_or(instant)
}

/// Parse the `Age` column. Fractional values truncate toward zero.
pub fn parse_age(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(age) = trimmed.parse::<i64>() {
        return Some(age);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|age| age.is_finite())
        .map(|age| age.trunc() as i64)
}

/// Age with the filter fallback: unparseable cells count as zero.
pub fn age_or_zero(raw: &str) -> i64 {
    parse_age(raw).unwrap_or(0)
}

/// Quantity with the sort fallback: unparseable cells count as zero.
/// Non-finite values also map to zero so quantity comparisons stay total.
pub fn quantity_or_zero(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|quantity| quantity.is_finite())
        .unwrap_or(0.0)
}

/// Split the comma-separated `Tags` column into trimmed, non-empty labels.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
