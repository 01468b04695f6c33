use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use super::badges::{evaluate_badges, Badge};
use super::bucket::MoodBucket;
use super::calendar::{build_calendar, CalendarWeek, MonthWindow};
use super::dates::{dated_entries, DatedEntry};
use super::streak::{compute_streaks, StreakState};
use super::trends::{
    average_rating, distribution, last_seven_days, summarize_month, weekly_trend, DayAverage,
    Distribution, MonthSummary,
};
use crate::error::{AppError, AppResult};
use crate::models::mood_entry::MoodEntry;
use crate::store::EntryStore;

/// Everything the dashboard page renders for one user and month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub calendar: Vec<CalendarWeek>,
    pub total_entries: usize,
    pub average_mood: Option<f64>,
    pub distribution: Distribution,
    pub weekly_trend: [Option<f64>; 7],
    pub last_seven_days: Vec<DayAverage>,
    pub summary: MonthSummary,
    pub streak: StreakState,
    pub badges: Vec<Badge>,
    pub all_time_entries: usize,
    pub logged_today: bool,
}

impl Dashboard {
    /// Pure aggregation over already-fetched entries. `month_entries` may contain rows
    /// outside `window`; they are dropped after date normalization.
    pub fn compute(
        window: MonthWindow,
        month_entries: &[MoodEntry],
        all_entries: &[MoodEntry],
        today: NaiveDate,
        filter: Option<MoodBucket>,
    ) -> Self {
        let in_month: Vec<DatedEntry<'_>> = dated_entries(month_entries)
            .into_iter()
            .filter(|e| window.contains(e.date))
            .collect();
        let history = dated_entries(all_entries);

        let streak = compute_streaks(history.iter().map(|e| e.date), today);
        let badges = evaluate_badges(streak.current, all_entries.len());

        Self {
            year: window.year,
            month: window.month,
            month_name: window.title(),
            calendar: build_calendar(&window, &in_month),
            total_entries: in_month.len(),
            average_mood: average_rating(&in_month),
            distribution: distribution(&in_month),
            weekly_trend: weekly_trend(&in_month, today),
            last_seven_days: last_seven_days(&in_month, today),
            summary: summarize_month(&in_month, filter),
            streak,
            badges,
            all_time_entries: all_entries.len(),
            logged_today: history.iter().any(|e| e.date == today),
        }
    }
}

/// Fetch a user's entries from `store` and aggregate them. `year`/`month` default to
/// the store's current month; the month is carried into the year when out of range.
pub async fn load_dashboard<S: EntryStore>(
    store: &S,
    user_id: Uuid,
    year: Option<i32>,
    month: Option<i32>,
    filter: Option<MoodBucket>,
) -> AppResult<Dashboard> {
    let today = store.today().await?;
    let year = year.unwrap_or_else(|| today.year());
    let month = month.unwrap_or(today.month() as i32);

    let window = MonthWindow::resolve(year, month)
        .ok_or_else(|| AppError::Validation(format!("Year {year} is out of range")))?;

    // One read serves both views; compute narrows the month slice to the window.
    let all_entries = store.entries_for_user(user_id).await?;

    let dashboard = Dashboard::compute(window, &all_entries, &all_entries, today, filter);

    tracing::debug!(
        user_id = %user_id,
        year = dashboard.year,
        month = dashboard.month,
        month_entries = dashboard.total_entries,
        all_time_entries = dashboard.all_time_entries,
        current_streak = dashboard.streak.current,
        "Dashboard computed"
    );

    Ok(dashboard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::dates::RawDate;
    use crate::models::mood_entry::test_entry;
    use crate::store::MemoryEntryStore;
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn labels(dashboard: &Dashboard) -> Vec<&'static str> {
        dashboard.badges.iter().map(|b| b.label()).collect()
    }

    #[tokio::test]
    async fn empty_user() {
        let store = MemoryEntryStore::new(ymd(2025, 11, 20));
        let dashboard = load_dashboard(&store, Uuid::new_v4(), None, None, None)
            .await
            .unwrap();

        assert_eq!((dashboard.year, dashboard.month), (2025, 11));
        assert_eq!(dashboard.month_name, "November 2025");
        assert_eq!(dashboard.total_entries, 0);
        assert_eq!(dashboard.average_mood, None);
        assert_eq!(dashboard.distribution, [0; 5]);
        assert_eq!(dashboard.weekly_trend, [None; 7]);
        assert_eq!(dashboard.streak, StreakState::default());
        assert!(dashboard.badges.is_empty());
        assert_eq!(dashboard.summary.bucket, MoodBucket::Neutral);
        assert!(!dashboard.logged_today);
    }

    #[tokio::test]
    async fn three_day_streak_ending_today() {
        let today = ymd(2025, 11, 20);
        let user_id = Uuid::new_v4();
        let store = MemoryEntryStore::new(today);
        for (days_ago, rating) in [(0, 8), (1, 5), (2, 3)] {
            store
                .insert(test_entry(today - Duration::days(days_ago), rating).owned_by(user_id))
                .await;
        }

        let dashboard = load_dashboard(&store, user_id, None, None, None)
            .await
            .unwrap();

        assert_eq!(dashboard.total_entries, 3);
        assert_eq!(dashboard.average_mood, Some(5.3));
        assert_eq!(dashboard.distribution, [0, 1, 1, 1, 0]);
        assert_eq!(dashboard.streak, StreakState { current: 3, longest: 3 });
        assert_eq!(labels(&dashboard), vec!["1-Day Streak", "3-Day Streak"]);
        assert!(dashboard.logged_today);
    }

    #[tokio::test]
    async fn other_users_are_invisible() {
        let today = ymd(2025, 11, 20);
        let user_id = Uuid::new_v4();
        let store = MemoryEntryStore::new(today);
        store.insert(test_entry(today, 9).owned_by(Uuid::new_v4())).await;

        let dashboard = load_dashboard(&store, user_id, None, None, None)
            .await
            .unwrap();
        assert_eq!(dashboard.all_time_entries, 0);
    }

    /// Counts history reads on top of the in-memory store.
    struct CountingStore {
        inner: MemoryEntryStore,
        reads: AtomicUsize,
    }

    impl EntryStore for CountingStore {
        async fn today(&self) -> AppResult<NaiveDate> {
            self.inner.today().await
        }

        async fn entries_for_user(&self, user_id: Uuid) -> AppResult<Vec<MoodEntry>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.entries_for_user(user_id).await
        }
    }

    #[tokio::test]
    async fn history_is_read_once() {
        let today = ymd(2025, 11, 20);
        let user_id = Uuid::new_v4();
        let inner = MemoryEntryStore::new(today);
        inner.insert(test_entry(ymd(2025, 10, 31), 6).owned_by(user_id)).await;
        inner.insert(test_entry(ymd(2025, 11, 19), 8).owned_by(user_id)).await;
        inner.insert(test_entry(today, 9).owned_by(user_id)).await;
        let store = CountingStore {
            inner,
            reads: AtomicUsize::new(0),
        };

        let dashboard = load_dashboard(&store, user_id, None, None, None)
            .await
            .unwrap();

        assert_eq!(store.reads.load(Ordering::SeqCst), 1);
        assert_eq!(dashboard.total_entries, 2);
        assert_eq!(dashboard.all_time_entries, 3);
        assert_eq!(dashboard.streak, StreakState { current: 2, longest: 2 });
    }

    #[tokio::test]
    async fn month_thirteen_is_next_january() {
        let user_id = Uuid::new_v4();
        let store = MemoryEntryStore::new(ymd(2025, 11, 20));
        store.insert(test_entry(ymd(2026, 1, 15), 9).owned_by(user_id)).await;
        store.insert(test_entry(ymd(2025, 1, 15), 2).owned_by(user_id)).await;

        let dashboard = load_dashboard(&store, user_id, Some(2025), Some(13), None)
            .await
            .unwrap();
        assert_eq!((dashboard.year, dashboard.month), (2026, 1));
        assert_eq!(dashboard.total_entries, 1);
        assert_eq!(dashboard.distribution, [0, 0, 0, 0, 1]);
    }

    #[tokio::test]
    async fn out_of_range_year_is_rejected() {
        let store = MemoryEntryStore::new(ymd(2025, 11, 20));
        let result = load_dashboard(&store, Uuid::new_v4(), Some(i32::MAX), Some(12), None).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn unparseable_dates_count_for_badges_only() {
        let today = ymd(2025, 11, 20);
        let mut entries: Vec<MoodEntry> = (0..9)
            .map(|i| test_entry(ymd(2025, 11, 1) + Duration::days(i), 6))
            .collect();
        let mut broken = test_entry(today, 6);
        broken.raw_date = RawDate::from("not a date");
        entries.push(broken);

        let window = MonthWindow::resolve(2025, 11).unwrap();
        let dashboard = Dashboard::compute(window, &entries, &entries, today, None);

        assert_eq!(dashboard.total_entries, 9);
        assert_eq!(dashboard.distribution.iter().sum::<u32>(), 9);
        assert_eq!(dashboard.all_time_entries, 10);
        assert_eq!(labels(&dashboard), vec!["10 Entries"]);
        assert!(!dashboard.logged_today);
    }

    #[test]
    fn mixed_date_forms_line_up() {
        let today = ymd(2025, 11, 10);
        let mut entries = vec![test_entry(today, 7), test_entry(today, 7), test_entry(today, 7)];
        entries[0].raw_date = RawDate::from("20251109");
        entries[1].raw_date = RawDate::from(20251108_i64);
        entries[2].raw_date = RawDate::from("2025-11-10T07:15:00");

        let window = MonthWindow::resolve(2025, 11).unwrap();
        let dashboard = Dashboard::compute(window, &entries, &entries, today, None);
        assert_eq!(dashboard.streak, StreakState { current: 3, longest: 3 });
    }

    #[test]
    fn compute_is_idempotent() {
        let today = ymd(2025, 11, 20);
        let entries: Vec<MoodEntry> = [(18, 4), (19, 9), (19, 2), (20, 6)]
            .iter()
            .map(|(day, rating)| test_entry(ymd(2025, 11, *day), *rating))
            .collect();
        let window = MonthWindow::resolve(2025, 11).unwrap();

        let first = Dashboard::compute(window, &entries, &entries, today, None);
        let second = Dashboard::compute(window, &entries, &entries, today, None);
        assert_eq!(first, second);
    }

    #[test]
    fn filter_overrides_summary_only() {
        let today = ymd(2025, 11, 20);
        let entries = vec![test_entry(today, 9), test_entry(today, 9)];
        let window = MonthWindow::resolve(2025, 11).unwrap();

        let dashboard =
            Dashboard::compute(window, &entries, &entries, today, Some(MoodBucket::Bad));
        assert_eq!(dashboard.summary.bucket, MoodBucket::Bad);
        assert_eq!(dashboard.summary.days, 0);
        assert_eq!(dashboard.distribution, [0, 0, 0, 0, 2]);
    }
}
