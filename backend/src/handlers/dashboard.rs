use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::aggregation::{load_dashboard, Dashboard};
use crate::auth::middleware::AuthUser;
use crate::error::AppResult;
use crate::handlers::parse_mood_filter;
use crate::store::PgEntryStore;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub mood: Option<String>,
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<Dashboard>> {
    let filter = parse_mood_filter(query.mood.as_deref())?;
    let store = PgEntryStore::new(state.db.clone());

    let dashboard = load_dashboard(&store, auth_user.id, query.year, query.month, filter).await?;

    Ok(Json(dashboard))
}
