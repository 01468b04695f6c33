use axum::{extract::State, Extension, Json};

use crate::aggregation::{load_weekly_summaries, WeeklySummary};
use crate::auth::middleware::AuthUser;
use crate::error::AppResult;
use crate::store::PgEntryStore;
use crate::AppState;

pub async fn get_weekly_summaries(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Vec<WeeklySummary>>> {
    let store = PgEntryStore::new(state.db.clone());
    let summaries = load_weekly_summaries(&store, auth_user.id).await?;
    Ok(Json(summaries))
}
