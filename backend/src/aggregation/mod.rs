//! # MoodArc — Dashboard aggregation
//!
//! Turns a user's raw mood entries into the structures the dashboard renders:
//! the month calendar, bucket distribution, trend series, streaks, and badges.
//!
//! Flow: stored entry dates are normalized first (`dates`), then fed to the
//! calendar, trend, and streak computations; badges are derived from the streak and
//! the all-time entry count. Nothing here fails on bad historical data: unreadable
//! dates are skipped, empty histories produce empty aggregates, and out-of-range
//! months are carried into the adjacent year.

pub mod badges;
pub mod bucket;
pub mod calendar;
pub mod dashboard;
pub mod dates;
pub mod streak;
pub mod trends;
pub mod weekly;

pub use badges::{evaluate_badges, Badge};
pub use bucket::MoodBucket;
pub use calendar::{build_calendar, CalendarCell, CalendarWeek, MonthWindow};
pub use dashboard::{load_dashboard, Dashboard};
pub use dates::{dated_entries, normalize_date, DatedEntry, RawDate};
pub use streak::{compute_streaks, StreakState};
pub use trends::{DayAverage, Distribution, MonthSummary};
pub use weekly::{load_weekly_summaries, weekly_summaries, WeeklySummary};
