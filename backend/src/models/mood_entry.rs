use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::aggregation::{normalize_date, MoodBucket, RawDate};

/// A stored mood entry. `entry_date` is kept in whatever form it was written and read
/// through [`normalize_date`]; the store does not enforce one entry per user per day.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MoodEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(rename = "entry_date", try_from = "String")]
    pub raw_date: RawDate,
    pub rating: i32,
    pub label: Option<String>,
    pub notes: Option<String>,
    pub is_private: bool,
    pub time_spent_seconds: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl MoodEntry {
    pub fn entry_date(&self) -> Option<NaiveDate> {
        normalize_date(&self.raw_date)
    }

    pub fn bucket(&self) -> Option<MoodBucket> {
        MoodBucket::from_rating(self.rating)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMoodEntryRequest {
    /// Any accepted date form; defaults to the store's current date.
    pub entry_date: Option<RawDate>,

    #[validate(range(min = 1, max = 10, message = "Rating must be between 1 and 10"))]
    pub rating: i32,

    #[validate(length(min = 1, max = 50, message = "Label must be 1-50 characters"))]
    pub label: Option<String>,

    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,

    #[serde(default)]
    pub is_private: bool,

    /// When the user opened the entry form, for timed entries.
    pub started_at: Option<DateTime<Utc>>,
}

/// Partial edit; absent fields keep their stored value.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMoodEntryRequest {
    pub entry_date: Option<RawDate>,

    #[validate(range(min = 1, max = 10, message = "Rating must be between 1 and 10"))]
    pub rating: Option<i32>,

    #[validate(length(min = 1, max = 50, message = "Label must be 1-50 characters"))]
    pub label: Option<String>,

    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,

    pub is_private: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct MoodEntryQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub mood: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MoodEntryResponse {
    pub id: Uuid,
    pub entry_date: Option<NaiveDate>,
    pub rating: i32,
    pub bucket: Option<MoodBucket>,
    pub label: Option<String>,
    pub notes: Option<String>,
    pub is_private: bool,
    pub time_spent_seconds: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<&MoodEntry> for MoodEntryResponse {
    fn from(entry: &MoodEntry) -> Self {
        Self {
            id: entry.id,
            entry_date: entry.entry_date(),
            rating: entry.rating,
            bucket: entry.bucket(),
            label: entry.label.clone(),
            notes: entry.notes.clone(),
            is_private: entry.is_private,
            time_spent_seconds: entry.time_spent_seconds,
            created_at: entry.created_at,
        }
    }
}

/// Seconds between opening the entry form and saving it, never negative.
pub fn time_spent_seconds(started_at: DateTime<Utc>, saved_at: DateTime<Utc>) -> i32 {
    (saved_at - started_at)
        .num_seconds()
        .clamp(0, i64::from(i32::MAX)) as i32
}

#[cfg(test)]
pub(crate) fn test_entry(date: NaiveDate, rating: i32) -> MoodEntry {
    MoodEntry {
        id: Uuid::new_v4(),
        user_id: Uuid::nil(),
        raw_date: RawDate::Date(date),
        rating,
        label: MoodBucket::from_rating(rating).map(|b| b.display_name().to_string()),
        notes: None,
        is_private: false,
        time_spent_seconds: None,
        created_at: Utc::now(),
    }
}

#[cfg(test)]
impl MoodEntry {
    pub(crate) fn owned_by(mut self, user_id: Uuid) -> Self {
        self.user_id = user_id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn time_spent_is_elapsed_seconds() {
        let saved = Utc::now();
        assert_eq!(time_spent_seconds(saved - Duration::seconds(45), saved), 45);
    }

    #[test]
    fn time_spent_never_negative() {
        let saved = Utc::now();
        assert_eq!(time_spent_seconds(saved + Duration::minutes(5), saved), 0);
    }

    #[test]
    fn request_validation() {
        let request: CreateMoodEntryRequest =
            serde_json::from_str(r#"{"rating": 11, "entry_date": "20251110"}"#).unwrap();
        assert!(request.validate().is_err());
        assert_eq!(request.entry_date, Some(RawDate::Text("20251110".into())));

        let request: CreateMoodEntryRequest =
            serde_json::from_str(r#"{"rating": 7, "label": ""}"#).unwrap();
        assert!(request.validate().is_err());

        let request: CreateMoodEntryRequest =
            serde_json::from_str(r#"{"rating": 7, "notes": "Yoga class"}"#).unwrap();
        assert!(request.validate().is_ok());
        assert!(!request.is_private);
        assert_eq!(request.entry_date, None);
    }

    #[test]
    fn update_validation() {
        let request: UpdateMoodEntryRequest =
            serde_json::from_str(r#"{"rating": 11}"#).unwrap();
        assert!(request.validate().is_err());

        let request: UpdateMoodEntryRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.rating, None);
        assert_eq!(request.is_private, None);

        let request: UpdateMoodEntryRequest =
            serde_json::from_str(r#"{"notes": "Long walk", "is_private": true}"#).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.is_private, Some(true));
    }

    #[test]
    fn response_uses_normalized_date() {
        let mut entry = test_entry(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), 4);
        entry.raw_date = RawDate::from("20250103");
        let response = MoodEntryResponse::from(&entry);
        assert_eq!(response.entry_date, NaiveDate::from_ymd_opt(2025, 1, 3));
        assert_eq!(response.bucket, Some(MoodBucket::Bad));
    }
}
