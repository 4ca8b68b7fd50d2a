//! Reminder endpoints under /api/reminders.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use chrono::{Duration, Local};
use serde::Deserialize;
use serde_json::json;

use super::{detail, internal_error, to_json};
use crate::state::AppState;
use asistan_store::parse_iso;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reminders", get(list_reminders))
        .route("/reminders/create", post(create_reminder))
        .route("/reminders/user/{user_id}/active", get(active_reminders))
        .route("/reminders/user/{user_id}/upcoming", get(upcoming_reminders))
        .route(
            "/reminders/{reminder_id}",
            get(get_reminder).put(update_reminder).delete(delete_reminder),
        )
        .route("/reminders/{reminder_id}/complete", patch(complete_reminder))
}

#[derive(Debug, Deserialize)]
struct ReminderRequest {
    title: String,
    #[serde(default)]
    description: Option<String>,
    reminder_time: String,
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    user_id: Option<String>,
    #[serde(default)]
    include_completed: bool,
}

#[derive(Debug, Deserialize)]
struct UpcomingQuery {
    hours: Option<i64>,
}

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

async fn create_reminder(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReminderRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let time = match parse_iso(&req.reminder_time) {
        Some(time) => time,
        None => return detail(StatusCode::BAD_REQUEST, "Geçersiz tarih formatı"),
    };

    match state.store.create_reminder(
        &req.title,
        req.description.as_deref(),
        &time.format(ISO_FORMAT).to_string(),
        &req.user_id,
    ) {
        Ok(reminder) => (StatusCode::OK, to_json(reminder)),
        Err(err) => internal_error(&err, "Hatırlatıcı oluşturulurken hata oluştu"),
    }
}

async fn list_reminders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state
        .store
        .list_reminders(query.user_id.as_deref(), query.include_completed)
    {
        Ok(reminders) => (StatusCode::OK, to_json(reminders)),
        Err(err) => internal_error(&err, "Hatırlatıcılar listelenirken hata oluştu"),
    }
}

async fn get_reminder(
    State(state): State<Arc<AppState>>,
    Path(reminder_id): Path<String>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.store.get_reminder(&reminder_id) {
        Ok(Some(reminder)) => (StatusCode::OK, to_json(reminder)),
        Ok(None) => detail(StatusCode::NOT_FOUND, "Hatırlatıcı bulunamadı"),
        Err(err) => internal_error(&err, "Hatırlatıcı getirilirken hata oluştu"),
    }
}

/// Field update; the completion flag survives the rewrite.
async fn update_reminder(
    State(state): State<Arc<AppState>>,
    Path(reminder_id): Path<String>,
    Json(req): Json<ReminderRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let time = match parse_iso(&req.reminder_time) {
        Some(time) => time,
        None => return detail(StatusCode::BAD_REQUEST, "Geçersiz tarih formatı"),
    };

    match state.store.update_reminder(
        &reminder_id,
        &req.title,
        req.description.as_deref(),
        &time.format(ISO_FORMAT).to_string(),
    ) {
        Ok(Some(reminder)) => (StatusCode::OK, to_json(reminder)),
        Ok(None) => detail(StatusCode::NOT_FOUND, "Hatırlatıcı bulunamadı"),
        Err(err) => internal_error(&err, "Hatırlatıcı güncellenirken hata oluştu"),
    }
}

async fn complete_reminder(
    State(state): State<Arc<AppState>>,
    Path(reminder_id): Path<String>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.store.complete_reminder(&reminder_id) {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({
                "message": "Hatırlatıcı tamamlandı olarak işaretlendi",
                "reminder_id": reminder_id,
            })),
        ),
        Ok(false) => detail(StatusCode::NOT_FOUND, "Hatırlatıcı bulunamadı"),
        Err(err) => internal_error(&err, "Hatırlatıcı tamamlanırken hata oluştu"),
    }
}

async fn delete_reminder(
    State(state): State<Arc<AppState>>,
    Path(reminder_id): Path<String>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.store.delete_reminder(&reminder_id) {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({
                "message": "Hatırlatıcı başarıyla silindi",
                "deleted_reminder_id": reminder_id,
            })),
        ),
        Ok(false) => detail(StatusCode::NOT_FOUND, "Hatırlatıcı bulunamadı"),
        Err(err) => internal_error(&err, "Hatırlatıcı silinirken hata oluştu"),
    }
}

async fn active_reminders(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.store.list_reminders(Some(&user_id), false) {
        Ok(reminders) => (StatusCode::OK, to_json(reminders)),
        Err(err) => internal_error(&err, "Aktif hatırlatıcılar getirilirken hata oluştu"),
    }
}

async fn upcoming_reminders(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<UpcomingQuery>,
) -> (StatusCode, Json<serde_json::Value>) {
    let hours = query.hours.unwrap_or(24);
    let now = Local::now().naive_local();
    let from = now.format(ISO_FORMAT).to_string();
    let to = (now + Duration::hours(hours)).format(ISO_FORMAT).to_string();

    match state.store.list_reminders(Some(&user_id), false) {
        Ok(reminders) => {
            let upcoming: Vec<_> = reminders
                .into_iter()
                .filter(|r| r.reminder_time >= from && r.reminder_time <= to)
                .collect();
            (
                StatusCode::OK,
                Json(json!({
                    "period_hours": hours,
                    "count": upcoming.len(),
                    "reminders": upcoming,
                })),
            )
        }
        Err(err) => internal_error(&err, "Yaklaşan hatırlatıcılar getirilirken hata oluştu"),
    }
}
