//! Read access to stored mood entries.
//!
//! Aggregation code only sees entries through [`EntryStore`]. Production uses
//! [`PgEntryStore`]; tests and local tooling use [`MemoryEntryStore`].

use std::future::Future;

use chrono::NaiveDate;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::aggregation::normalize_date;
use crate::error::AppResult;
use crate::models::mood_entry::MoodEntry;

pub trait EntryStore: Send + Sync {
    /// The store's current calendar date. Streaks and "today" checks use this clock.
    fn today(&self) -> impl Future<Output = AppResult<NaiveDate>> + Send;

    /// All of a user's entries in retrieval order (oldest created first), including
    /// entries whose date cannot be read.
    fn entries_for_user(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = AppResult<Vec<MoodEntry>>> + Send;

    /// Entries whose normalized date falls in `[start, end)`.
    fn entries_between(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Future<Output = AppResult<Vec<MoodEntry>>> + Send {
        async move {
            let entries = self.entries_for_user(user_id).await?;
            Ok(entries
                .into_iter()
                .filter(|entry| {
                    normalize_date(&entry.raw_date).is_some_and(|date| date >= start && date < end)
                })
                .collect())
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgEntryStore {
    db: PgPool,
}

impl PgEntryStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

impl EntryStore for PgEntryStore {
    async fn today(&self) -> AppResult<NaiveDate> {
        let today = sqlx::query_scalar::<_, NaiveDate>("SELECT CURRENT_DATE")
            .fetch_one(&self.db)
            .await?;
        Ok(today)
    }

    // entry_date is free-form text, so date ranges are applied after normalization.
    async fn entries_for_user(&self, user_id: Uuid) -> AppResult<Vec<MoodEntry>> {
        let entries = sqlx::query_as::<_, MoodEntry>(
            r#"
            SELECT * FROM mood_entries
            WHERE user_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }
}

/// In-process store with a fixed clock.
#[derive(Debug)]
pub struct MemoryEntryStore {
    today: NaiveDate,
    entries: RwLock<Vec<MoodEntry>>,
}

impl MemoryEntryStore {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            entries: RwLock::new(Vec::new()),
        }
    }

    pub async fn insert(&self, entry: MoodEntry) {
        self.entries.write().await.push(entry);
    }
}

impl EntryStore for MemoryEntryStore {
    async fn today(&self) -> AppResult<NaiveDate> {
        Ok(self.today)
    }

    async fn entries_for_user(&self, user_id: Uuid) -> AppResult<Vec<MoodEntry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .cloned()
            .collect())
    }
}
