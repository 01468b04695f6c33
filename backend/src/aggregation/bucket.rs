use serde::{Deserialize, Serialize};

/// Qualitative mood category derived from a 1-10 rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodBucket {
    Terrible,
    Bad,
    Neutral,
    Good,
    Excellent,
}

impl MoodBucket {
    pub const ALL: [MoodBucket; 5] = [
        MoodBucket::Terrible,
        MoodBucket::Bad,
        MoodBucket::Neutral,
        MoodBucket::Good,
        MoodBucket::Excellent,
    ];

    /// Ratings outside 1..=10 have no bucket.
    pub fn from_rating(rating: i32) -> Option<Self> {
        match rating {
            1..=2 => Some(MoodBucket::Terrible),
            3..=4 => Some(MoodBucket::Bad),
            5..=6 => Some(MoodBucket::Neutral),
            7..=8 => Some(MoodBucket::Good),
            9..=10 => Some(MoodBucket::Excellent),
            _ => None,
        }
    }

    /// 1-based bucket index (terrible = 1 .. excellent = 5).
    pub fn index(self) -> usize {
        match self {
            MoodBucket::Terrible => 1,
            MoodBucket::Bad => 2,
            MoodBucket::Neutral => 3,
            MoodBucket::Good => 4,
            MoodBucket::Excellent => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MoodBucket::Terrible => "terrible",
            MoodBucket::Bad => "bad",
            MoodBucket::Neutral => "neutral",
            MoodBucket::Good => "good",
            MoodBucket::Excellent => "excellent",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            MoodBucket::Terrible => "Terrible",
            MoodBucket::Bad => "Bad",
            MoodBucket::Neutral => "Neutral",
            MoodBucket::Good => "Good",
            MoodBucket::Excellent => "Excellent",
        }
    }

    /// Case-insensitive lookup by name, as sent in `?mood=` filters.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        MoodBucket::ALL
            .into_iter()
            .find(|bucket| bucket.as_str().eq_ignore_ascii_case(name))
    }

    /// Monthly recap line for a bucket that covered `days` entries.
    pub fn recap_message(self, days: u32) -> String {
        let noun = if days == 1 { "day" } else { "days" };
        match self {
            MoodBucket::Terrible => format!(
                "You had {days} terrible {noun} this month. Be gentle with yourself and reach out to someone you trust."
            ),
            MoodBucket::Bad => format!(
                "You had {days} bad {noun} this month. Small routines can help turn things around."
            ),
            MoodBucket::Neutral => format!(
                "You had {days} neutral {noun} this month. Steady is a fine place to build from."
            ),
            MoodBucket::Good => format!(
                "You had {days} good {noun} this month. Keep doing what works for you."
            ),
            MoodBucket::Excellent => format!(
                "You had {days} excellent {noun} this month. Take a moment to notice what made them great."
            ),
        }
    }
}

impl std::fmt::Display for MoodBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
