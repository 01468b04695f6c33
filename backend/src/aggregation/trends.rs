use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use super::bucket::MoodBucket;
use super::dates::DatedEntry;

/// Entry counts per bucket, terrible first.
pub type Distribution = [u32; 5];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayAverage {
    pub date: NaiveDate,
    pub average: Option<f64>,
}

/// The month's dominant bucket and a human-readable recap of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthSummary {
    pub bucket: MoodBucket,
    pub days: u32,
    pub message: String,
}

pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn mean(ratings: impl IntoIterator<Item = i32>) -> Option<f64> {
    let (sum, count) = ratings
        .into_iter()
        .fold((0i64, 0u32), |(sum, count), r| (sum + i64::from(r), count + 1));
    (count > 0).then(|| round_one_decimal(sum as f64 / f64::from(count)))
}

pub fn average_rating(entries: &[DatedEntry<'_>]) -> Option<f64> {
    mean(entries.iter().map(|e| e.entry.rating))
}

pub fn distribution(entries: &[DatedEntry<'_>]) -> Distribution {
    let mut counts = [0u32; 5];
    for bucket in entries
        .iter()
        .filter_map(|e| MoodBucket::from_rating(e.entry.rating))
    {
        counts[bucket.index() - 1] += 1;
    }
    counts
}

/// Average rating per weekday (Monday first) for the Monday-start week containing `today`.
pub fn weekly_trend(entries: &[DatedEntry<'_>], today: NaiveDate) -> [Option<f64>; 7] {
    let week_start = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));

    let mut trend = [None; 7];
    for (slot, day) in trend.iter_mut().zip(week_start.iter_days()) {
        *slot = mean(
            entries
                .iter()
                .filter(|e| e.date == day)
                .map(|e| e.entry.rating),
        );
    }
    trend
}

/// Averages for the seven calendar days ending with `today`, oldest first.
///
/// Only `entries` are consulted, so when they come from a single month query the days
/// before the month boundary read as having no data.
pub fn last_seven_days(entries: &[DatedEntry<'_>], today: NaiveDate) -> Vec<DayAverage> {
    (0..7)
        .rev()
        .map(|back| {
            let date = today - Duration::days(back);
            let average = mean(
                entries
                    .iter()
                    .filter(|e| e.date == date)
                    .map(|e| e.entry.rating),
            );
            DayAverage { date, average }
        })
        .collect()
}

/// Pick the month's dominant bucket.
///
/// Counting runs in entry order and the leader only changes when another bucket
/// strictly overtakes it, so on a tie the bucket that reached the top count first wins.
/// A `filter` replaces the computed bucket outright. With nothing to count the summary
/// falls back to neutral.
pub fn summarize_month(entries: &[DatedEntry<'_>], filter: Option<MoodBucket>) -> MonthSummary {
    let mut counts = [0u32; 5];
    let mut leader: Option<(MoodBucket, u32)> = None;

    for bucket in entries
        .iter()
        .filter_map(|e| MoodBucket::from_rating(e.entry.rating))
    {
        let count = &mut counts[bucket.index() - 1];
        *count += 1;
        if leader.map_or(true, |(_, best)| *count > best) {
            leader = Some((bucket, *count));
        }
    }

    let bucket = filter
        .or(leader.map(|(bucket, _)| bucket))
        .unwrap_or(MoodBucket::Neutral);
    let days = counts[bucket.index() - 1];

    MonthSummary {
        bucket,
        days,
        message: bucket.recap_message(days),
    }
}
