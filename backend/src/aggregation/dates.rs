//! Date normalization for stored mood entries.
//!
//! Rows imported from older deployments carry their entry date in whatever shape the
//! writer produced: ISO dates, ISO date-times, compact `YYYYMMDD` strings or integers,
//! and Unix epoch seconds. Every date-keyed aggregation goes through [`normalize_date`]
//! first; values that cannot be read yield `None` and are left out of calendar and streak
//! computations.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::mood_entry::MoodEntry;

/// A stored entry date before normalization.
///
/// JSON strings always deserialize as `Text` so they go through the strict parser;
/// chrono's own string parsing accepts unpadded components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Integer(i64),
    Other(serde_json::Value),
}

impl From<NaiveDate> for RawDate {
    fn from(date: NaiveDate) -> Self {
        RawDate::Date(date)
    }
}

impl From<NaiveDateTime> for RawDate {
    fn from(datetime: NaiveDateTime) -> Self {
        RawDate::DateTime(datetime)
    }
}

impl From<String> for RawDate {
    fn from(text: String) -> Self {
        RawDate::Text(text)
    }
}

impl From<&str> for RawDate {
    fn from(text: &str) -> Self {
        RawDate::Text(text.to_string())
    }
}

impl From<i64> for RawDate {
    fn from(value: i64) -> Self {
        RawDate::Integer(value)
    }
}

/// Coerce a stored date into a calendar date. Never fails; unreadable input is `None`.
pub fn normalize_date(raw: &RawDate) -> Option<NaiveDate> {
    match raw {
        RawDate::Date(date) => Some(*date),
        RawDate::DateTime(datetime) => Some(datetime.date()),
        RawDate::Text(text) => parse_text(text),
        RawDate::Integer(value) => parse_integer(*value),
        RawDate::Other(_) => None,
    }
}

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

fn parse_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if has_iso_date_shape(text) {
        if text.len() == 10 {
            return NaiveDate::parse_from_str(text, "%Y-%m-%d").ok();
        }
        if let Some(datetime) = NAIVE_DATETIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        {
            return Some(datetime.date());
        }
    }

    // Offset-aware timestamps keep the calendar date as written, not the UTC date.
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.date_naive());
    }

    if text.bytes().all(|b| b.is_ascii_digit()) {
        if text.len() == 8 {
            return parse_compact(text);
        }
        return text.parse::<i64>().ok().and_then(from_epoch_seconds);
    }

    None
}

/// Zero-padded `YYYY-MM-DD` prefix. chrono alone also accepts `2025-1-5`.
fn has_iso_date_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() >= 10
        && bytes[..10].iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

fn parse_integer(value: i64) -> Option<NaiveDate> {
    if (10_000_000..=99_999_999).contains(&value) {
        parse_compact(&value.to_string())
    } else {
        from_epoch_seconds(value)
    }
}

/// `YYYYMMDD`, already known to be eight ASCII digits.
fn parse_compact(digits: &str) -> Option<NaiveDate> {
    let year = digits.get(0..4)?.parse::<i32>().ok()?;
    let month = digits.get(4..6)?.parse::<u32>().ok()?;
    let day = digits.get(6..8)?.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn from_epoch_seconds(secs: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(secs, 0).map(|datetime| datetime.date_naive())
}

/// An entry paired with its normalized calendar date.
#[derive(Debug, Clone, Copy)]
pub struct DatedEntry<'a> {
    pub date: NaiveDate,
    pub entry: &'a MoodEntry,
}

/// Normalize every entry's date, dropping the ones that cannot be read.
/// Input order is preserved.
pub fn dated_entries(entries: &[MoodEntry]) -> Vec<DatedEntry<'_>> {
    let dated: Vec<DatedEntry<'_>> = entries
        .iter()
        .filter_map(|entry| {
            normalize_date(&entry.raw_date).map(|date| DatedEntry { date, entry })
        })
        .collect();

    let skipped = entries.len() - dated.len();
    if skipped > 0 {
        tracing::debug!(skipped, "Excluded entries with unparseable dates");
    }

    dated
}
