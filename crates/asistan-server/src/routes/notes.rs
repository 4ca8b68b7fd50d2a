//! Note endpoints under /api/notes.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::{detail, internal_error, to_json};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/notes", get(list_notes).post(create_note))
        .route("/notes/create", post(create_note_json))
        .route("/notes/list/{user_id}", get(user_notes))
        .route("/notes/{note_id}", get(get_note).delete(delete_note))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateNoteQuery {
    title: String,
    content: String,
    #[serde(default = "default_user")]
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct NoteRequest {
    title: String,
    content: String,
    user_id: String,
    #[serde(default)]
    is_voice_note: bool,
}

fn default_user() -> String {
    "default".to_string()
}

async fn list_notes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.store.list_notes(query.user_id.as_deref()) {
        Ok(notes) => {
            let count = notes.len();
            (StatusCode::OK, Json(json!({ "notes": notes, "count": count })))
        }
        Err(err) => internal_error(&err, "Notlar listelenirken hata oluştu"),
    }
}

/// Quick note creation via query parameters.
async fn create_note(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CreateNoteQuery>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state
        .store
        .create_note(&query.title, &query.content, &query.user_id, false)
    {
        Ok(note) => (
            StatusCode::OK,
            Json(json!({
                "id": note.id,
                "title": note.title,
                "content": note.content,
                "message": "Not başarıyla oluşturuldu",
            })),
        ),
        Err(err) => internal_error(&err, "Not oluşturulurken hata oluştu"),
    }
}

async fn create_note_json(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NoteRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state
        .store
        .create_note(&req.title, &req.content, &req.user_id, req.is_voice_note)
    {
        Ok(note) => (StatusCode::OK, to_json(note)),
        Err(err) => internal_error(&err, "Not oluşturulurken hata oluştu"),
    }
}

async fn user_notes(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.store.list_notes(Some(&user_id)) {
        Ok(notes) => (StatusCode::OK, to_json(notes)),
        Err(err) => internal_error(&err, "Notlar listelenirken hata oluştu"),
    }
}

async fn get_note(
    State(state): State<Arc<AppState>>,
    Path(note_id): Path<String>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.store.get_note(&note_id) {
        Ok(Some(note)) => (StatusCode::OK, to_json(note)),
        Ok(None) => detail(StatusCode::NOT_FOUND, "Not bulunamadı"),
        Err(err) => internal_error(&err, "Not getirilirken hata oluştu"),
    }
}

async fn delete_note(
    State(state): State<Arc<AppState>>,
    Path(note_id): Path<String>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.store.delete_note(&note_id) {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({
                "message": "Not başarıyla silindi",
                "deleted_note_id": note_id,
            })),
        ),
        Ok(false) => detail(StatusCode::NOT_FOUND, "Not bulunamadı"),
        Err(err) => internal_error(&err, "Not silinirken hata oluştu"),
    }
}
