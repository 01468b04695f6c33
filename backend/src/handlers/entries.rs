use std::cmp::Reverse;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::aggregation::{normalize_date, MoodBucket};
use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::handlers::parse_mood_filter;
use crate::models::mood_entry::{
    time_spent_seconds, CreateMoodEntryRequest, MoodEntry, MoodEntryQuery, MoodEntryResponse,
    UpdateMoodEntryRequest,
};
use crate::store::{EntryStore, PgEntryStore};
use crate::AppState;

pub async fn create_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateMoodEntryRequest>,
) -> AppResult<Json<MoodEntryResponse>> {
    body.validate()?;

    let entry_date = match &body.entry_date {
        Some(raw) => normalize_date(raw).ok_or_else(|| {
            AppError::Validation("entry_date is not a recognizable date".into())
        })?,
        None => PgEntryStore::new(state.db.clone()).today().await?,
    };

    let saved_at = Utc::now();
    let time_spent = body
        .started_at
        .map(|started_at| time_spent_seconds(started_at, saved_at));
    let label = body.label.clone().or_else(|| {
        MoodBucket::from_rating(body.rating).map(|bucket| bucket.display_name().to_string())
    });

    let entry = sqlx::query_as::<_, MoodEntry>(
        r#"
        INSERT INTO mood_entries
            (id, user_id, entry_date, rating, label, notes, is_private, time_spent_seconds, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(entry_date.format("%Y-%m-%d").to_string())
    .bind(body.rating)
    .bind(&label)
    .bind(&body.notes)
    .bind(body.is_private)
    .bind(time_spent)
    .bind(saved_at)
    .fetch_one(&state.db)
    .await?;

    tracing::info!(
        user_id = %auth_user.id,
        entry_id = %entry.id,
        entry_date = %entry_date,
        rating = entry.rating,
        "Mood entry created"
    );

    Ok(Json(MoodEntryResponse::from(&entry)))
}

pub async fn list_entries(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<MoodEntryQuery>,
) -> AppResult<Json<Vec<MoodEntryResponse>>> {
    let filter = parse_mood_filter(query.mood.as_deref())?;
    let store = PgEntryStore::new(state.db.clone());
    let entries = store.entries_for_user(auth_user.id).await?;

    let selected = select_entries(&entries, query.start_date, query.end_date, filter);
    Ok(Json(selected.into_iter().map(MoodEntryResponse::from).collect()))
}

pub async fn get_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(entry_id): Path<Uuid>,
) -> AppResult<Json<MoodEntryResponse>> {
    let entry = sqlx::query_as::<_, MoodEntry>(
        "SELECT * FROM mood_entries WHERE id = $1 AND user_id = $2",
    )
    .bind(entry_id)
    .bind(auth_user.id)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("Mood entry not found".into()))?;

    Ok(Json(MoodEntryResponse::from(&entry)))
}

pub async fn update_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(entry_id): Path<Uuid>,
    Json(body): Json<UpdateMoodEntryRequest>,
) -> AppResult<Json<MoodEntryResponse>> {
    body.validate()?;

    let entry_date = body
        .entry_date
        .as_ref()
        .map(|raw| {
            normalize_date(raw).ok_or_else(|| {
                AppError::Validation("entry_date is not a recognizable date".into())
            })
        })
        .transpose()?;

    let entry = sqlx::query_as::<_, MoodEntry>(
        r#"
        UPDATE mood_entries SET
            entry_date = COALESCE($3, entry_date),
            rating = COALESCE($4, rating),
            label = COALESCE($5, label),
            notes = COALESCE($6, notes),
            is_private = COALESCE($7, is_private)
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(entry_id)
    .bind(auth_user.id)
    .bind(entry_date.map(|date| date.format("%Y-%m-%d").to_string()))
    .bind(body.rating)
    .bind(&body.label)
    .bind(&body.notes)
    .bind(body.is_private)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("Mood entry not found".into()))?;

    tracing::info!(
        user_id = %auth_user.id,
        entry_id = %entry.id,
        rating = entry.rating,
        "Mood entry updated"
    );

    Ok(Json(MoodEntryResponse::from(&entry)))
}

/// Idempotent: deleting a missing entry still reports success.
pub async fn delete_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(entry_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM mood_entries WHERE id = $1 AND user_id = $2")
        .bind(entry_id)
        .bind(auth_user.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() > 0 {
        tracing::info!(user_id = %auth_user.id, entry_id = %entry_id, "Mood entry deleted");
    }

    Ok(Json(serde_json::json!({ "deleted": true, "id": entry_id })))
}

/// Filter and order entries for the log view: newest date first, newest created first
/// within a date. Bounds are inclusive. Entries with unreadable dates only appear in
/// unbounded listings, after everything else.
fn select_entries(
    entries: &[MoodEntry],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    mood: Option<MoodBucket>,
) -> Vec<&MoodEntry> {
    let bounded = start.is_some() || end.is_some();

    let mut selected: Vec<(Option<NaiveDate>, &MoodEntry)> = entries
        .iter()
        .filter(|entry| mood.map_or(true, |bucket| entry.bucket() == Some(bucket)))
        .map(|entry| (entry.entry_date(), entry))
        .filter(|(date, _)| match date {
            Some(date) => {
                start.map_or(true, |start| *date >= start) && end.map_or(true, |end| *date <= end)
            }
            None => !bounded,
        })
        .collect();

    selected.sort_by_key(|(date, entry)| {
        (date.is_none(), Reverse(*date), Reverse(entry.created_at))
    });
    selected.into_iter().map(|(_, entry)| entry).collect()
}
