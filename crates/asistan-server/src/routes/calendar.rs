//! Calendar endpoints under /api/calendar.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::json;

use super::{detail, internal_error, to_json};
use crate::state::AppState;
use asistan_store::{parse_iso, CalendarEvent};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/calendar/events", get(list_events).post(create_event))
        .route("/calendar/create-event", post(create_event_json))
        .route("/calendar/events/today/{user_id}", get(today_events))
        .route("/calendar/events/upcoming/{user_id}", get(upcoming_events))
        .route(
            "/calendar/events/{id}",
            get(user_events).put(update_event).delete(delete_event),
        )
}

#[derive(Debug, Deserialize)]
struct CreateEventQuery {
    title: String,
    datetime_str: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_user")]
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct CalendarEventRequest {
    title: String,
    #[serde(default)]
    description: Option<String>,
    start_time: String,
    end_time: String,
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct WindowQuery {
    start_date: Option<String>,
    end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpcomingQuery {
    days: Option<i64>,
}

fn default_user() -> String {
    "default".to_string()
}

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Accepts a full timestamp or a bare `YYYY-MM-DD` date (midnight).
fn parse_boundary(s: &str) -> Option<NaiveDateTime> {
    parse_iso(s).or_else(|| {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    })
}

/// Compact event shape the chat pipeline embeds in model context and
/// reads back for canned answers. `datetime` carries the start time.
pub(crate) fn event_summary(event: &CalendarEvent) -> serde_json::Value {
    json!({
        "id": event.id,
        "title": event.title,
        "description": event.description.clone().unwrap_or_default(),
        "datetime": event.start_time,
        "created_at": event.created_at,
    })
}

async fn list_events(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.store.all_events() {
        Ok(events) => (
            StatusCode::OK,
            Json(json!({ "count": events.len(), "events": events })),
        ),
        Err(err) => internal_error(&err, "Etkinlikler listelenirken hata oluştu"),
    }
}

/// Quick event creation via query parameters. An unparseable timestamp
/// falls back to one hour from now.
async fn create_event(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CreateEventQuery>,
) -> (StatusCode, Json<serde_json::Value>) {
    let start = parse_iso(&query.datetime_str)
        .unwrap_or_else(|| Local::now().naive_local() + Duration::hours(1));
    let end = start + Duration::hours(1);

    match state.store.create_event(
        &query.title,
        Some(&query.description),
        &start.format(ISO_FORMAT).to_string(),
        &end.format(ISO_FORMAT).to_string(),
        &query.user_id,
    ) {
        Ok(event) => (StatusCode::OK, to_json(event)),
        Err(err) => internal_error(&err, "Takvim etkinliği oluşturulurken hata oluştu"),
    }
}

async fn create_event_json(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CalendarEventRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let (start, end) = match (parse_iso(&req.start_time), parse_iso(&req.end_time)) {
        (Some(start), Some(end)) => (start, end),
        _ => return detail(StatusCode::BAD_REQUEST, "Geçersiz tarih formatı"),
    };
    if start >= end {
        return detail(
            StatusCode::BAD_REQUEST,
            "Başlangıç zamanı bitiş zamanından önce olmalıdır",
        );
    }

    match state.store.create_event(
        &req.title,
        req.description.as_deref(),
        &start.format(ISO_FORMAT).to_string(),
        &end.format(ISO_FORMAT).to_string(),
        &req.user_id,
    ) {
        Ok(event) => (StatusCode::OK, to_json(event)),
        Err(err) => internal_error(&err, "Takvim etkinliği oluşturulurken hata oluştu"),
    }
}

async fn user_events(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<WindowQuery>,
) -> (StatusCode, Json<serde_json::Value>) {
    let start_filter = match &query.start_date {
        Some(raw) => match parse_boundary(raw) {
            Some(dt) => Some(dt.format(ISO_FORMAT).to_string()),
            None => {
                return detail(
                    StatusCode::BAD_REQUEST,
                    "Geçersiz başlangıç tarihi formatı (YYYY-MM-DD kullanın)",
                )
            }
        },
        None => None,
    };
    let end_filter = match &query.end_date {
        Some(raw) => match parse_boundary(raw) {
            Some(dt) => Some(dt.format(ISO_FORMAT).to_string()),
            None => {
                return detail(
                    StatusCode::BAD_REQUEST,
                    "Geçersiz bitiş tarihi formatı (YYYY-MM-DD kullanın)",
                )
            }
        },
        None => None,
    };

    match state.store.events_for_user(&user_id) {
        Ok(events) => {
            let filtered: Vec<CalendarEvent> = events
                .into_iter()
                .filter(|e| {
                    start_filter
                        .as_deref()
                        .map_or(true, |f| e.start_time.as_str() >= f)
                })
                .filter(|e| end_filter.as_deref().map_or(true, |f| e.end_time.as_str() <= f))
                .collect();
            (StatusCode::OK, to_json(filtered))
        }
        Err(err) => internal_error(&err, "Etkinlikler listelenirken hata oluştu"),
    }
}

async fn today_events(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> (StatusCode, Json<serde_json::Value>) {
    let today = Local::now().date_naive();
    let from = format!("{}T00:00:00", today.format("%Y-%m-%d"));
    let to = format!("{}T23:59:59", today.format("%Y-%m-%d"));

    match state.store.events_in_window(&user_id, &from, &to) {
        Ok(events) => (
            StatusCode::OK,
            Json(json!({
                "date": today.format("%Y-%m-%d").to_string(),
                "count": events.len(),
                "events": events,
            })),
        ),
        Err(err) => internal_error(&err, "Bugünkü etkinlikler getirilirken hata oluştu"),
    }
}

async fn upcoming_events(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<UpcomingQuery>,
) -> (StatusCode, Json<serde_json::Value>) {
    let days = query.days.unwrap_or(7);
    let now = Local::now().naive_local();
    let from = now.format(ISO_FORMAT).to_string();
    let to = (now + Duration::days(days)).format(ISO_FORMAT).to_string();

    match state.store.events_in_window(&user_id, &from, &to) {
        Ok(events) => (
            StatusCode::OK,
            Json(json!({
                "period_days": days,
                "count": events.len(),
                "events": events,
            })),
        ),
        Err(err) => internal_error(&err, "Yaklaşan etkinlikler getirilirken hata oluştu"),
    }
}

async fn update_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
    Json(req): Json<CalendarEventRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let (start, end) = match (parse_iso(&req.start_time), parse_iso(&req.end_time)) {
        (Some(start), Some(end)) => (start, end),
        _ => return detail(StatusCode::BAD_REQUEST, "Geçersiz tarih formatı"),
    };
    if start >= end {
        return detail(
            StatusCode::BAD_REQUEST,
            "Başlangıç zamanı bitiş zamanından önce olmalıdır",
        );
    }

    match state.store.update_event(
        &event_id,
        &req.title,
        req.description.as_deref(),
        &start.format(ISO_FORMAT).to_string(),
        &end.format(ISO_FORMAT).to_string(),
    ) {
        Ok(Some(event)) => (StatusCode::OK, to_json(event)),
        Ok(None) => detail(StatusCode::NOT_FOUND, "Etkinlik bulunamadı"),
        Err(err) => internal_error(&err, "Etkinlik güncellenirken hata oluştu"),
    }
}

async fn delete_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.store.delete_event(&event_id) {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({
                "message": "Etkinlik başarıyla silindi",
                "deleted_event_id": event_id,
            })),
        ),
        Ok(false) => detail(StatusCode::NOT_FOUND, "Etkinlik bulunamadı"),
        Err(err) => internal_error(&err, "Etkinlik silinirken hata oluştu"),
    }
}
