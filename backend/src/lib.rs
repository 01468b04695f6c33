//! # MoodArc API
//!
//! Mood journal backend: entry CRUD plus the dashboard aggregation (calendar,
//! trends, streaks, badges) and weekly summaries.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

pub mod aggregation;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod store;

use config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
}

/// All routes with auth and request tracing applied. CORS is layered on by the binary.
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz));

    let protected_routes = Router::new()
        // Entries
        .route(
            "/api/entries",
            post(handlers::entries::create_entry).get(handlers::entries::list_entries),
        )
        .route(
            "/api/entries/:id",
            get(handlers::entries::get_entry)
                .put(handlers::entries::update_entry)
                .delete(handlers::entries::delete_entry),
        )
        // Dashboard & summaries
        .route("/api/dashboard", get(handlers::dashboard::get_dashboard))
        .route(
            "/api/summaries/weekly",
            get(handlers::summaries::get_weekly_summaries),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
