//! Month grid for the dashboard calendar.
//!
//! Weeks run Sunday to Saturday. Cells outside the month are fillers with every field
//! empty.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::bucket::MoodBucket;
use super::dates::DatedEntry;
use crate::models::mood_entry::MoodEntry;

/// A resolved calendar month: `[start, end)` spans exactly the month's days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub year: i32,
    pub month: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthWindow {
    /// Resolve a possibly out-of-range month by carrying into the year, so month 13 of
    /// 2025 is January 2026 and month 0 is December of the previous year. `None` only
    /// when the resulting year is outside the supported date range.
    pub fn resolve(year: i32, month: i32) -> Option<Self> {
        let zero_based = i64::from(month) - 1;
        let year = i32::try_from(i64::from(year) + zero_based.div_euclid(12)).ok()?;
        let month = u32::try_from(zero_based.rem_euclid(12) + 1).ok()?;

        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = if month == 12 {
            NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };

        Some(Self {
            year,
            month,
            start,
            end,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    pub fn days(&self) -> u32 {
        (self.end - self.start).num_days() as u32
    }

    /// Display title such as "June 2025".
    pub fn title(&self) -> String {
        self.start.format("%B %Y").to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CalendarCell {
    pub date: Option<NaiveDate>,
    pub rating: Option<i32>,
    pub bucket: Option<MoodBucket>,
}

pub type CalendarWeek = [CalendarCell; 7];

/// Build the week rows for `window`. Entries outside the window are ignored.
///
/// When several entries share a date the cell shows the most recently created one;
/// equal `created_at` values fall back to the later entry in input order.
pub fn build_calendar(window: &MonthWindow, entries: &[DatedEntry<'_>]) -> Vec<CalendarWeek> {
    let mut by_date: HashMap<NaiveDate, &MoodEntry> = HashMap::new();
    for dated in entries.iter().filter(|e| window.contains(e.date)) {
        by_date
            .entry(dated.date)
            .and_modify(|current| {
                if dated.entry.created_at >= current.created_at {
                    *current = dated.entry;
                }
            })
            .or_insert(dated.entry);
    }

    let leading = window.start.weekday().num_days_from_sunday() as usize;
    let days = window.days() as usize;
    let rows = (leading + days).div_ceil(7);

    let mut weeks: Vec<CalendarWeek> = vec![Default::default(); rows];
    for (offset, date) in window.start.iter_days().take(days).enumerate() {
        let slot = leading + offset;
        let entry = by_date.get(&date);
        weeks[slot / 7][slot % 7] = CalendarCell {
            date: Some(date),
            rating: entry.map(|e| e.rating),
            bucket: entry.and_then(|e| MoodBucket::from_rating(e.rating)),
        };
    }

    weeks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::dates::dated_entries;
    use crate::models::mood_entry::test_entry;
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn month_thirteen_carries_into_next_year() {
        let window = MonthWindow::resolve(2025, 13).unwrap();
        assert_eq!((window.year, window.month), (2026, 1));
        assert_eq!(window.start, ymd(2026, 1, 1));
        assert_eq!(window.end, ymd(2026, 2, 1));
    }

    #[test]
    fn month_zero_borrows_from_previous_year() {
        let window = MonthWindow::resolve(2025, 0).unwrap();
        assert_eq!((window.year, window.month), (2024, 12));
        assert_eq!(window.end, ymd(2025, 1, 1));

        let window = MonthWindow::resolve(2025, -13).unwrap();
        assert_eq!((window.year, window.month), (2023, 11));
    }

    #[test]
    fn year_out_of_range_does_not_resolve() {
        assert_eq!(MonthWindow::resolve(i32::MAX, 12), None);
    }

    #[test]
    fn leap_february() {
        let window = MonthWindow::resolve(2024, 2).unwrap();
        assert_eq!(window.days(), 29);
        assert_eq!(window.title(), "February 2024");
    }

    #[test]
    fn grid_starts_on_sunday() {
        // June 2025 starts on a Sunday and has 30 days: five rows, no leading filler.
        let window = MonthWindow::resolve(2025, 6).unwrap();
        let weeks = build_calendar(&window, &[]);
        assert_eq!(weeks.len(), 5);
        assert_eq!(weeks[0][0].date, Some(ymd(2025, 6, 1)));
        assert_eq!(weeks[4][1].date, Some(ymd(2025, 6, 30)));
        assert_eq!(weeks[4][2], CalendarCell::default());
    }

    #[test]
    fn grid_pads_leading_and_trailing_cells() {
        // November 2025 starts on a Saturday: six rows.
        let window = MonthWindow::resolve(2025, 11).unwrap();
        let weeks = build_calendar(&window, &[]);
        assert_eq!(weeks.len(), 6);
        assert!(weeks[0][..6].iter().all(|cell| cell.date.is_none()));
        assert_eq!(weeks[0][6].date, Some(ymd(2025, 11, 1)));
        assert_eq!(weeks[5][0].date, Some(ymd(2025, 11, 30)));

        let filled = weeks.iter().flatten().filter(|c| c.date.is_some()).count();
        assert_eq!(filled, 30);
    }

    #[test]
    fn february_starting_on_sunday_fits_four_rows() {
        let window = MonthWindow::resolve(2015, 2).unwrap();
        assert_eq!(build_calendar(&window, &[]).len(), 4);
    }

    #[test]
    fn cells_carry_rating_and_bucket() {
        let entries = vec![
            test_entry(ymd(2025, 6, 3), 8),
            test_entry(ymd(2025, 7, 1), 2),
        ];
        let dated = dated_entries(&entries);
        let window = MonthWindow::resolve(2025, 6).unwrap();
        let weeks = build_calendar(&window, &dated);

        let cell = &weeks[0][2];
        assert_eq!(cell.date, Some(ymd(2025, 6, 3)));
        assert_eq!(cell.rating, Some(8));
        assert_eq!(cell.bucket, Some(MoodBucket::Good));

        let rated = weeks.iter().flatten().filter(|c| c.rating.is_some()).count();
        assert_eq!(rated, 1);
    }

    #[test]
    fn duplicate_day_shows_most_recently_created_entry() {
        let now = Utc::now();
        let mut newer = test_entry(ymd(2025, 6, 3), 9);
        newer.created_at = now;
        let mut older = test_entry(ymd(2025, 6, 3), 3);
        older.created_at = now - Duration::hours(2);

        let entries = vec![newer, older];
        let dated = dated_entries(&entries);
        let window = MonthWindow::resolve(2025, 6).unwrap();
        let weeks = build_calendar(&window, &dated);
        assert_eq!(weeks[0][2].rating, Some(9));
    }

    #[test]
    fn duplicate_day_with_equal_timestamps_keeps_the_later_entry() {
        let mut first = test_entry(ymd(2025, 6, 3), 4);
        let mut second = test_entry(ymd(2025, 6, 3), 6);
        let stamp = Utc::now();
        first.created_at = stamp;
        second.created_at = stamp;

        let entries = vec![first, second];
        let dated = dated_entries(&entries);
        let window = MonthWindow::resolve(2025, 6).unwrap();
        assert_eq!(build_calendar(&window, &dated)[0][2].rating, Some(6));
    }
}
