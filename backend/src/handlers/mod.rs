pub mod dashboard;
pub mod entries;
pub mod health;
pub mod summaries;

use crate::aggregation::MoodBucket;
use crate::error::{AppError, AppResult};

/// Parse an optional `?mood=` filter. Blank values mean no filter.
pub(crate) fn parse_mood_filter(mood: Option<&str>) -> AppResult<Option<MoodBucket>> {
    match mood.map(str::trim).filter(|m| !m.is_empty()) {
        None => Ok(None),
        Some(name) => MoodBucket::parse(name)
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("Unknown mood filter: {name}"))),
    }
}
