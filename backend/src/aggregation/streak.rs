use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreakState {
    pub current: u32,
    pub longest: u32,
}

/// Compute streaks over a user's entry dates. Duplicates and input order do not matter.
///
/// The current streak is anchored on the latest date only when that date is `today` or
/// yesterday; any older latest date means the streak has lapsed.
pub fn compute_streaks<I>(dates: I, today: NaiveDate) -> StreakState
where
    I: IntoIterator<Item = NaiveDate>,
{
    let dates: Vec<NaiveDate> = dates.into_iter().collect::<BTreeSet<_>>().into_iter().collect();

    let mut longest_streak = 0u32;
    let mut streak = 0u32;
    let mut prev_date: Option<NaiveDate> = None;

    for date in &dates {
        streak = match prev_date {
            Some(prev) if prev.succ_opt() == Some(*date) => streak + 1,
            _ => 1,
        };
        longest_streak = longest_streak.max(streak);
        prev_date = Some(*date);
    }

    let mut current_streak = 0u32;
    if let Some(&latest) = dates.last() {
        if latest == today || Some(latest) == today.pred_opt() {
            let mut check_date = Some(latest);
            for date in dates.iter().rev() {
                if Some(*date) != check_date {
                    break;
                }
                current_streak += 1;
                check_date = date.pred_opt();
            }
        }
    }

    StreakState {
        current: current_streak,
        longest: longest_streak,
    }
}
