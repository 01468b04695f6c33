use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Badge {
    StreakOneDay,
    StreakThreeDays,
    StreakSevenDays,
    StreakFourteenDays,
    StreakThirtyDays,
    TenEntries,
    TwentyFiveEntries,
    FiftyEntries,
    HundredEntries,
}

const STREAK_MILESTONES: [(u32, Badge); 5] = [
    (1, Badge::StreakOneDay),
    (3, Badge::StreakThreeDays),
    (7, Badge::StreakSevenDays),
    (14, Badge::StreakFourteenDays),
    (30, Badge::StreakThirtyDays),
];

const ENTRY_MILESTONES: [(usize, Badge); 4] = [
    (10, Badge::TenEntries),
    (25, Badge::TwentyFiveEntries),
    (50, Badge::FiftyEntries),
    (100, Badge::HundredEntries),
];

impl Badge {
    pub fn label(self) -> &'static str {
        match self {
            Badge::StreakOneDay => "1-Day Streak",
            Badge::StreakThreeDays => "3-Day Streak",
            Badge::StreakSevenDays => "7-Day Streak",
            Badge::StreakFourteenDays => "14-Day Streak",
            Badge::StreakThirtyDays => "30-Day Streak",
            Badge::TenEntries => "10 Entries",
            Badge::TwentyFiveEntries => "25 Entries",
            Badge::FiftyEntries => "50 Entries",
            Badge::HundredEntries => "100 Entries",
        }
    }
}

impl Serialize for Badge {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Every streak and entry-count milestone reached, ordered by label.
///
/// `total_entries` is the all-time row count, duplicates and unreadable dates included.
pub fn evaluate_badges(current_streak: u32, total_entries: usize) -> Vec<Badge> {
    let mut badges: Vec<Badge> = STREAK_MILESTONES
        .iter()
        .filter(|(days, _)| current_streak >= *days)
        .map(|(_, badge)| *badge)
        .collect();

    badges.extend(
        ENTRY_MILESTONES
            .iter()
            .filter(|(count, _)| total_entries >= *count)
            .map(|(_, badge)| *badge),
    );

    badges.sort_by_key(|badge| badge.label());
    badges
}
