//! Week-by-week recap of a user's whole history.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use super::dates::{dated_entries, DatedEntry};
use super::trends::round_one_decimal;
use crate::error::AppResult;
use crate::store::EntryStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoodPoint {
    pub date: NaiveDate,
    pub rating: i32,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub entry_count: usize,
    pub average: f64,
    pub highest: MoodPoint,
    pub lowest: MoodPoint,
    pub labels: Vec<String>,
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

fn mood_point(dated: &DatedEntry<'_>) -> MoodPoint {
    MoodPoint {
        date: dated.date,
        rating: dated.entry.rating,
        label: dated.entry.label.clone(),
    }
}

/// Group entries into Monday-start weeks, most recent week first.
pub fn weekly_summaries(entries: &[DatedEntry<'_>]) -> Vec<WeeklySummary> {
    let mut weeks: BTreeMap<NaiveDate, Vec<&DatedEntry<'_>>> = BTreeMap::new();
    for dated in entries {
        weeks.entry(week_start(dated.date)).or_default().push(dated);
    }

    weeks
        .into_iter()
        .rev()
        .filter_map(|(start, members)| {
            let first = *members.first()?;
            let mut highest = first;
            let mut lowest = first;
            let mut sum = 0i64;
            let mut labels: Vec<String> = Vec::new();

            for dated in members.iter().copied() {
                sum += i64::from(dated.entry.rating);
                if dated.entry.rating > highest.entry.rating {
                    highest = dated;
                }
                if dated.entry.rating < lowest.entry.rating {
                    lowest = dated;
                }
                if let Some(label) = &dated.entry.label {
                    if !labels.contains(label) {
                        labels.push(label.clone());
                    }
                }
            }

            Some(WeeklySummary {
                week_start: start,
                week_end: start + Duration::days(6),
                entry_count: members.len(),
                average: round_one_decimal(sum as f64 / members.len() as f64),
                highest: mood_point(highest),
                lowest: mood_point(lowest),
                labels,
            })
        })
        .collect()
}

pub async fn load_weekly_summaries<S: EntryStore>(
    store: &S,
    user_id: Uuid,
) -> AppResult<Vec<WeeklySummary>> {
    let entries = store.entries_for_user(user_id).await?;
    let summaries = weekly_summaries(&dated_entries(&entries));

    tracing::debug!(
        user_id = %user_id,
        entries = entries.len(),
        weeks = summaries.len(),
        "Weekly summaries computed"
    );

    Ok(summaries)
}
