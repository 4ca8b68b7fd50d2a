//! HTTP route handlers for the API surface the mobile client calls.

pub mod calendar;
pub mod chat;
pub mod notes;
pub mod reminders;
pub mod weather;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;

use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api", api_routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(chat::routes())
        .merge(notes::routes())
        .merge(calendar::routes())
        .merge(reminders::routes())
        .merge(weather::routes())
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Kişisel Asistan API",
        "version": "1.0.0",
        "status": "active",
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "message": "API çalışıyor",
    }))
}

/// Error body shape the client expects: `{"detail": message}`.
pub(crate) fn detail(status: StatusCode, message: &str) -> (StatusCode, Json<serde_json::Value>) {
    (status, Json(serde_json::json!({ "detail": message })))
}

/// Log the failure, answer with a stable Turkish 500 detail.
pub(crate) fn internal_error(
    err: &asistan_core::Error,
    message: &str,
) -> (StatusCode, Json<serde_json::Value>) {
    tracing::error!("{}: {}", message, err);
    detail(StatusCode::INTERNAL_SERVER_ERROR, message)
}

/// Serialize a response payload; these types cannot actually fail.
pub(crate) fn to_json(value: impl serde::Serialize) -> Json<serde_json::Value> {
    Json(serde_json::to_value(value).unwrap_or(serde_json::Value::Null))
}
