//! SQLite persistence for notes, calendar events, reminders, chat history
//! and the weather cache.

use std::path::Path;

use chrono::{Local, NaiveDateTime};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};
use uuid::Uuid;

use crate::schema::SCHEMA_SQL;
use crate::types::{CalendarEvent, ChatMessage, Note, Reminder};
use asistan_core::{Error, Result};

const DB_FILE: &str = "asistan.db";

/// Current local time in the store's timestamp format.
pub fn now_iso() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Parse a stored or client-supplied timestamp. Tolerates fractional
/// seconds, an RFC 3339 offset, a trailing Z and a space separator.
pub fn parse_iso(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }
    let trimmed = trimmed.trim_end_matches('Z');
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }
    None
}

/// Document store backing every assistant collection.
pub struct AssistantStore {
    conn: Mutex<Connection>,
}

impl AssistantStore {
    /// Open or create the store. `db_dir` is the data directory; the
    /// database file is `db_dir/asistan.db`.
    pub fn open(db_dir: impl AsRef<Path>) -> Result<Self> {
        let db_dir = db_dir.as_ref();
        std::fs::create_dir_all(db_dir)?;
        let db_path = db_dir.join(DB_FILE);

        let conn = Self::create_connection(&db_path)?;
        Self::init_schema(&conn)?;

        info!("AssistantStore initialized at {}", db_path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory store, used when the data directory is not writable and
    /// in tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| Error::Database(e.to_string()))?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn create_connection(db_path: &Path) -> Result<Connection> {
        let conn = Connection::open(db_path).map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(conn)
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))?;
        Ok(())
    }

    // ---------------------------------------------------------------
    // Notes
    // ---------------------------------------------------------------

    pub fn create_note(
        &self,
        title: &str,
        content: &str,
        user_id: &str,
        is_voice_note: bool,
    ) -> Result<Note> {
        let now = now_iso();
        let note = Note {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            content: content.to_string(),
            user_id: user_id.to_string(),
            is_voice_note,
            created_at: now.clone(),
            updated_at: now,
        };

        let conn = self.conn.lock();
        conn.prepare_cached(
            "INSERT INTO notes (id, title, content, user_id, is_voice_note, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .map_err(|e| Error::Database(e.to_string()))?
        .execute(params![
            note.id,
            note.title,
            note.content,
            note.user_id,
            note.is_voice_note,
            note.created_at,
            note.updated_at
        ])
        .map_err(|e| Error::Database(e.to_string()))?;

        debug!("Note created: {}", note.id);
        Ok(note)
    }

    /// Notes for one user, or every note when `user_id` is `None`,
    /// newest first.
    pub fn list_notes(&self, user_id: Option<&str>) -> Result<Vec<Note>> {
        let conn = self.conn.lock();
        let result = conn
            .prepare_cached(
                "SELECT * FROM notes WHERE ?1 IS NULL OR user_id = ?1
                 ORDER BY created_at DESC, rowid DESC",
            )
            .map_err(|e| Error::Database(e.to_string()))?
            .query_map(params![user_id], |row| Ok(Self::row_to_note(row)))
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(|e| Error::Database(e.to_string()));
        result
    }

    pub fn get_note(&self, note_id: &str) -> Result<Option<Note>> {
        let conn = self.conn.lock();
        let result = conn
            .prepare_cached("SELECT * FROM notes WHERE id = ?1")
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![note_id], |row| Ok(Self::row_to_note(row)))
            .optional()
            .map_err(|e| Error::Database(e.to_string()));
        result
    }

    /// Partial update: `None` keeps the stored value. `updated_at` always
    /// moves; returns the stored row, or `None` when the id is unknown.
    pub fn update_note(
        &self,
        note_id: &str,
        title: Option<&str>,
        content: Option<&str>,
    ) -> Result<Option<Note>> {
        let now = now_iso();
        let updated = {
            let conn = self.conn.lock();
            let count = conn
                .prepare_cached(
                    "UPDATE notes SET title = COALESCE(?2, title),
                            content = COALESCE(?3, content), updated_at = ?4
                     WHERE id = ?1",
                )
                .map_err(|e| Error::Database(e.to_string()))?
                .execute(params![note_id, title, content, now])
                .map_err(|e| Error::Database(e.to_string()))?;
            count
        };
        if updated == 0 {
            return Ok(None);
        }
        self.get_note(note_id)
    }

    pub fn delete_note(&self, note_id: &str) -> Result<bool> {
        let conn = self.conn.lock();
        let count = conn
            .execute("DELETE FROM notes WHERE id = ?1", params![note_id])
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count > 0)
    }

    // ---------------------------------------------------------------
    // Calendar events
    // ---------------------------------------------------------------

    pub fn create_event(
        &self,
        title: &str,
        description: Option<&str>,
        start_time: &str,
        end_time: &str,
        user_id: &str,
    ) -> Result<CalendarEvent> {
        let event = CalendarEvent {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: description.map(str::to_string),
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            user_id: user_id.to_string(),
            created_at: now_iso(),
        };

        let conn = self.conn.lock();
        conn.prepare_cached(
            "INSERT INTO events (id, title, description, start_time, end_time, user_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .map_err(|e| Error::Database(e.to_string()))?
        .execute(params![
            event.id,
            event.title,
            event.description,
            event.start_time,
            event.end_time,
            event.user_id,
            event.created_at
        ])
        .map_err(|e| Error::Database(e.to_string()))?;

        debug!("Calendar event created: {}", event.id);
        Ok(event)
    }

    pub fn all_events(&self) -> Result<Vec<CalendarEvent>> {
        let conn = self.conn.lock();
        let result = conn
            .prepare_cached("SELECT * FROM events ORDER BY start_time")
            .map_err(|e| Error::Database(e.to_string()))?
            .query_map([], |row| Ok(Self::row_to_event(row)))
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(|e| Error::Database(e.to_string()));
        result
    }

    pub fn events_for_user(&self, user_id: &str) -> Result<Vec<CalendarEvent>> {
        let conn = self.conn.lock();
        let result = conn
            .prepare_cached("SELECT * FROM events WHERE user_id = ?1 ORDER BY start_time")
            .map_err(|e| Error::Database(e.to_string()))?
            .query_map(params![user_id], |row| Ok(Self::row_to_event(row)))
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(|e| Error::Database(e.to_string()));
        result
    }

    /// Events whose start time falls inside `[from, to]`, inclusive.
    /// ISO timestamps compare lexicographically.
    pub fn events_in_window(
        &self,
        user_id: &str,
        from: &str,
        to: &str,
    ) -> Result<Vec<CalendarEvent>> {
        let conn = self.conn.lock();
        let result = conn
            .prepare_cached(
                "SELECT * FROM events
                 WHERE user_id = ?1 AND start_time >= ?2 AND start_time <= ?3
                 ORDER BY start_time",
            )
            .map_err(|e| Error::Database(e.to_string()))?
            .query_map(params![user_id, from, to], |row| Ok(Self::row_to_event(row)))
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(|e| Error::Database(e.to_string()));
        result
    }

    pub fn get_event(&self, event_id: &str) -> Result<Option<CalendarEvent>> {
        let conn = self.conn.lock();
        let result = conn
            .prepare_cached("SELECT * FROM events WHERE id = ?1")
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![event_id], |row| Ok(Self::row_to_event(row)))
            .optional()
            .map_err(|e| Error::Database(e.to_string()));
        result
    }

    /// Full-field update. `user_id` and `created_at` are preserved;
    /// returns the stored row, or `None` when the id is unknown.
    pub fn update_event(
        &self,
        event_id: &str,
        title: &str,
        description: Option<&str>,
        start_time: &str,
        end_time: &str,
    ) -> Result<Option<CalendarEvent>> {
        let updated = {
            let conn = self.conn.lock();
            let count = conn
                .prepare_cached(
                    "UPDATE events SET title = ?2, description = ?3, start_time = ?4, end_time = ?5
                     WHERE id = ?1",
                )
                .map_err(|e| Error::Database(e.to_string()))?
                .execute(params![event_id, title, description, start_time, end_time])
                .map_err(|e| Error::Database(e.to_string()))?;
            count
        };
        if updated == 0 {
            return Ok(None);
        }
        self.get_event(event_id)
    }

    pub fn delete_event(&self, event_id: &str) -> Result<bool> {
        let conn = self.conn.lock();
        let count = conn
            .execute("DELETE FROM events WHERE id = ?1", params![event_id])
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count > 0)
    }

    // ---------------------------------------------------------------
    // Reminders
    // ---------------------------------------------------------------

    pub fn create_reminder(
        &self,
        title: &str,
        description: Option<&str>,
        reminder_time: &str,
        user_id: &str,
    ) -> Result<Reminder> {
        let reminder = Reminder {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: description.map(str::to_string),
            reminder_time: reminder_time.to_string(),
            user_id: user_id.to_string(),
            is_completed: false,
            created_at: now_iso(),
        };

        let conn = self.conn.lock();
        conn.prepare_cached(
            "INSERT INTO reminders (id, title, description, reminder_time, user_id, is_completed, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .map_err(|e| Error::Database(e.to_string()))?
        .execute(params![
            reminder.id,
            reminder.title,
            reminder.description,
            reminder.reminder_time,
            reminder.user_id,
            reminder.is_completed,
            reminder.created_at
        ])
        .map_err(|e| Error::Database(e.to_string()))?;

        debug!("Reminder created: {}", reminder.id);
        Ok(reminder)
    }

    /// Reminders ordered by their trigger time. Completed ones are
    /// included only on request.
    pub fn list_reminders(
        &self,
        user_id: Option<&str>,
        include_completed: bool,
    ) -> Result<Vec<Reminder>> {
        let conn = self.conn.lock();
        let result = conn
            .prepare_cached(
                "SELECT * FROM reminders
                 WHERE (?1 IS NULL OR user_id = ?1) AND (?2 OR is_completed = 0)
                 ORDER BY reminder_time",
            )
            .map_err(|e| Error::Database(e.to_string()))?
            .query_map(params![user_id, include_completed], |row| {
                Ok(Self::row_to_reminder(row))
            })
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(|e| Error::Database(e.to_string()));
        result
    }

    pub fn get_reminder(&self, reminder_id: &str) -> Result<Option<Reminder>> {
        let conn = self.conn.lock();
        let result = conn
            .prepare_cached("SELECT * FROM reminders WHERE id = ?1")
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![reminder_id], |row| Ok(Self::row_to_reminder(row)))
            .optional()
            .map_err(|e| Error::Database(e.to_string()));
        result
    }

    /// Field update that leaves the completion flag untouched.
    pub fn update_reminder(
        &self,
        reminder_id: &str,
        title: &str,
        description: Option<&str>,
        reminder_time: &str,
    ) -> Result<Option<Reminder>> {
        let updated = {
            let conn = self.conn.lock();
            let count = conn
                .prepare_cached(
                    "UPDATE reminders SET title = ?2, description = ?3, reminder_time = ?4
                     WHERE id = ?1",
                )
                .map_err(|e| Error::Database(e.to_string()))?
                .execute(params![reminder_id, title, description, reminder_time])
                .map_err(|e| Error::Database(e.to_string()))?;
            count
        };
        if updated == 0 {
            return Ok(None);
        }
        self.get_reminder(reminder_id)
    }

    pub fn complete_reminder(&self, reminder_id: &str) -> Result<bool> {
        let conn = self.conn.lock();
        let count = conn
            .execute(
                "UPDATE reminders SET is_completed = 1 WHERE id = ?1",
                params![reminder_id],
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count > 0)
    }

    pub fn delete_reminder(&self, reminder_id: &str) -> Result<bool> {
        let conn = self.conn.lock();
        let count = conn
            .execute("DELETE FROM reminders WHERE id = ?1", params![reminder_id])
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count > 0)
    }

    // ---------------------------------------------------------------
    // Chat history
    // ---------------------------------------------------------------

    pub fn save_chat_message(
        &self,
        user_id: &str,
        user_message: &str,
        ai_response: &str,
        intent: &str,
    ) -> Result<ChatMessage> {
        let message = ChatMessage {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            user_message: user_message.to_string(),
            ai_response: ai_response.to_string(),
            intent: intent.to_string(),
            timestamp: now_iso(),
        };

        let conn = self.conn.lock();
        conn.prepare_cached(
            "INSERT INTO chat_messages (id, user_id, user_message, ai_response, intent, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .map_err(|e| Error::Database(e.to_string()))?
        .execute(params![
            message.id,
            message.user_id,
            message.user_message,
            message.ai_response,
            message.intent,
            message.timestamp
        ])
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(message)
    }

    /// The latest `limit` messages for a user, returned oldest first.
    pub fn chat_history(&self, user_id: &str, limit: usize) -> Result<Vec<ChatMessage>> {
        let conn = self.conn.lock();
        let mut messages = conn
            .prepare_cached(
                "SELECT * FROM chat_messages WHERE user_id = ?1
                 ORDER BY timestamp DESC, rowid DESC LIMIT ?2",
            )
            .map_err(|e| Error::Database(e.to_string()))?
            .query_map(params![user_id, limit as i64], |row| {
                Ok(Self::row_to_chat_message(row))
            })
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(|e| Error::Database(e.to_string()))?;
        messages.reverse();
        Ok(messages)
    }

    /// Delete a user's history. Returns how many messages were removed.
    pub fn delete_chat_history(&self, user_id: &str) -> Result<usize> {
        let conn = self.conn.lock();
        conn.execute(
            "DELETE FROM chat_messages WHERE user_id = ?1",
            params![user_id],
        )
        .map_err(|e| Error::Database(e.to_string()))
    }

    // ---------------------------------------------------------------
    // Weather cache
    // ---------------------------------------------------------------

    /// Cache a weather payload for a city until `expires_at`.
    pub fn cache_weather(
        &self,
        city: &str,
        data: &serde_json::Value,
        cached_at: &str,
        expires_at: &str,
    ) -> Result<()> {
        let conn = self.conn.lock();
        conn.prepare_cached(
            "INSERT OR REPLACE INTO weather_cache (city, data_json, cached_at, expires_at)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .map_err(|e| Error::Database(e.to_string()))?
        .execute(params![
            city.to_lowercase(),
            data.to_string(),
            cached_at,
            expires_at
        ])
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    /// Cached payload for a city, unless it has expired by `now`.
    /// Expired rows are removed on the way out.
    pub fn cached_weather(&self, city: &str, now: &str) -> Result<Option<serde_json::Value>> {
        let key = city.to_lowercase();
        let conn = self.conn.lock();
        let row: Option<(String, String)> = conn
            .prepare_cached("SELECT data_json, expires_at FROM weather_cache WHERE city = ?1")
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![key], |row| Ok((row.get(0)?, row.get(1)?)))
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;

        match row {
            Some((data_json, expires_at)) => {
                if expires_at.as_str() <= now {
                    conn.execute("DELETE FROM weather_cache WHERE city = ?1", params![key])
                        .map_err(|e| Error::Database(e.to_string()))?;
                    return Ok(None);
                }
                Ok(serde_json::from_str(&data_json).ok())
            }
            None => Ok(None),
        }
    }

    // ---------------------------------------------------------------
    // Row mapping
    // ---------------------------------------------------------------

    fn row_to_note(row: &rusqlite::Row<'_>) -> Note {
        Note {
            id: row.get("id").unwrap_or_default(),
            title: row.get("title").unwrap_or_default(),
            content: row.get("content").unwrap_or_default(),
            user_id: row.get("user_id").unwrap_or_default(),
            is_voice_note: row.get("is_voice_note").unwrap_or(false),
            created_at: row.get("created_at").unwrap_or_default(),
            updated_at: row.get("updated_at").unwrap_or_default(),
        }
    }

    fn row_to_event(row: &rusqlite::Row<'_>) -> CalendarEvent {
        CalendarEvent {
            id: row.get("id").unwrap_or_default(),
            title: row.get("title").unwrap_or_default(),
            description: row.get("description").ok().flatten(),
            start_time: row.get("start_time").unwrap_or_default(),
            end_time: row.get("end_time").unwrap_or_default(),
            user_id: row.get("user_id").unwrap_or_default(),
            created_at: row.get("created_at").unwrap_or_default(),
        }
    }

    fn row_to_reminder(row: &rusqlite::Row<'_>) -> Reminder {
        Reminder {
            id: row.get("id").unwrap_or_default(),
            title: row.get("title").unwrap_or_default(),
            description: row.get("description").ok().flatten(),
            reminder_time: row.get("reminder_time").unwrap_or_default(),
            user_id: row.get("user_id").unwrap_or_default(),
            is_completed: row.get("is_completed").unwrap_or(false),
            created_at: row.get("created_at").unwrap_or_default(),
        }
    }

    fn row_to_chat_message(row: &rusqlite::Row<'_>) -> ChatMessage {
        ChatMessage {
            id: row.get("id").unwrap_or_default(),
            user_id: row.get("user_id").unwrap_or_default(),
            user_message: row.get("user_message").unwrap_or_default(),
            ai_response: row.get("ai_response").unwrap_or_default(),
            intent: row.get("intent").unwrap_or_default(),
            timestamp: row.get("timestamp").unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (AssistantStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = AssistantStore::open(dir.path()).unwrap();
        (store, dir)
    }

    #[test]
    fn test_create_and_get_note() {
        let (store, _dir) = test_store();

        let note = store
            .create_note("Market Listesi", "süt, ekmek, peynir", "default", false)
            .unwrap();

        let fetched = store.get_note(&note.id).unwrap().unwrap();
        assert_eq!(fetched.title, "Market Listesi");
        assert_eq!(fetched.content, "süt, ekmek, peynir");
        assert_eq!(fetched.user_id, "default");
        assert!(!fetched.is_voice_note);
        assert!(!fetched.created_at.is_empty());
    }

    #[test]
    fn test_list_notes_filters_by_user_newest_first() {
        let (store, _dir) = test_store();

        store.create_note("Birinci", "a", "ayşe", false).unwrap();
        store.create_note("İkinci", "b", "ayşe", true).unwrap();
        store.create_note("Başka", "c", "mehmet", false).unwrap();

        let notes = store.list_notes(Some("ayşe")).unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].title, "İkinci");
        assert_eq!(notes[1].title, "Birinci");

        assert_eq!(store.list_notes(None).unwrap().len(), 3);
    }

    #[test]
    fn test_update_note_is_partial() {
        let (store, _dir) = test_store();

        let note = store.create_note("Eski", "içerik", "default", false).unwrap();
        let updated = store
            .update_note(&note.id, Some("Yeni"), None)
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Yeni");
        assert_eq!(updated.content, "içerik");
        assert_eq!(updated.created_at, note.created_at);

        assert!(store.update_note("yok", Some("x"), None).unwrap().is_none());
    }

    #[test]
    fn test_delete_note() {
        let (store, _dir) = test_store();

        let note = store.create_note("Silinecek", "x", "default", false).unwrap();
        assert!(store.delete_note(&note.id).unwrap());
        assert!(store.get_note(&note.id).unwrap().is_none());
        assert!(!store.delete_note(&note.id).unwrap());
    }

    #[test]
    fn test_events_sorted_and_windowed() {
        let (store, _dir) = test_store();

        store
            .create_event("Geç", None, "2025-06-12T10:00:00", "2025-06-12T11:00:00", "default")
            .unwrap();
        store
            .create_event("Erken", None, "2025-06-10T09:00:00", "2025-06-10T10:00:00", "default")
            .unwrap();
        store
            .create_event("Orta", Some("not"), "2025-06-11T08:00:00", "2025-06-11T09:00:00", "default")
            .unwrap();

        let events = store.events_for_user("default").unwrap();
        let titles: Vec<&str> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["Erken", "Orta", "Geç"]);

        let window = store
            .events_in_window("default", "2025-06-10T00:00:00", "2025-06-11T23:59:59")
            .unwrap();
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].title, "Erken");
    }

    #[test]
    fn test_update_event_preserves_identity_fields() {
        let (store, _dir) = test_store();

        let event = store
            .create_event("Eski", Some("ilk"), "2025-06-10T09:00:00", "2025-06-10T10:00:00", "ayşe")
            .unwrap();

        let updated = store
            .update_event(&event.id, "Yeni", None, "2025-06-10T11:00:00", "2025-06-10T12:00:00")
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Yeni");
        assert!(updated.description.is_none());
        assert_eq!(updated.user_id, "ayşe");
        assert_eq!(updated.created_at, event.created_at);

        assert!(store
            .update_event("yok", "x", None, "2025-01-01T00:00:00", "2025-01-01T01:00:00")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_reminder_completion_flow() {
        let (store, _dir) = test_store();

        let reminder = store
            .create_reminder("İlaç", None, "2025-06-10T20:00:00", "default")
            .unwrap();
        assert!(!reminder.is_completed);

        assert_eq!(store.list_reminders(Some("default"), false).unwrap().len(), 1);
        assert!(store.complete_reminder(&reminder.id).unwrap());
        assert!(store.list_reminders(Some("default"), false).unwrap().is_empty());

        let all = store.list_reminders(Some("default"), true).unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].is_completed);

        assert!(!store.complete_reminder("yok").unwrap());
    }

    #[test]
    fn test_update_reminder_keeps_completion_flag() {
        let (store, _dir) = test_store();

        let reminder = store
            .create_reminder("Su iç", Some("günde iki litre"), "2025-06-10T08:00:00", "default")
            .unwrap();
        store.complete_reminder(&reminder.id).unwrap();

        let updated = store
            .update_reminder(&reminder.id, "Su iç", None, "2025-06-11T08:00:00")
            .unwrap()
            .unwrap();
        assert!(updated.is_completed);
        assert_eq!(updated.reminder_time, "2025-06-11T08:00:00");
        assert!(updated.description.is_none());
    }

    #[test]
    fn test_chat_history_limit_and_order() {
        let (store, _dir) = test_store();

        store.save_chat_message("default", "bir", "cevap 1", "chat").unwrap();
        store.save_chat_message("default", "iki", "cevap 2", "chat").unwrap();
        store.save_chat_message("default", "üç", "cevap 3", "note").unwrap();
        store.save_chat_message("başka", "dört", "cevap 4", "chat").unwrap();

        let history = store.chat_history("default", 2).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].user_message, "iki");
        assert_eq!(history[1].user_message, "üç");

        assert_eq!(store.delete_chat_history("default").unwrap(), 3);
        assert!(store.chat_history("default", 10).unwrap().is_empty());
        assert_eq!(store.chat_history("başka", 10).unwrap().len(), 1);
    }

    #[test]
    fn test_weather_cache_expiry() {
        let (store, _dir) = test_store();

        let payload = serde_json::json!({"city": "İstanbul", "temperature": 21.5});
        store
            .cache_weather("İstanbul", &payload, "2025-06-10T10:00:00", "2025-06-10T10:30:00")
            .unwrap();

        let hit = store.cached_weather("İSTANBUL", "2025-06-10T10:15:00").unwrap();
        assert_eq!(hit.unwrap()["temperature"], 21.5);

        assert!(store
            .cached_weather("İstanbul", "2025-06-10T10:30:00")
            .unwrap()
            .is_none());
        // the expired row is gone even for an earlier clock
        assert!(store
            .cached_weather("İstanbul", "2025-06-10T10:01:00")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_in_memory_store_round_trip() {
        let store = AssistantStore::in_memory().unwrap();
        let note = store.create_note("Geçici", "ram", "default", false).unwrap();
        assert!(store.get_note(&note.id).unwrap().is_some());
    }

    #[test]
    fn test_parse_iso_variants() {
        assert!(parse_iso("2025-06-10T09:00:00").is_some());
        assert!(parse_iso("2025-06-10T09:00:00.123456").is_some());
        assert!(parse_iso("2025-06-10 09:00:00").is_some());
        assert!(parse_iso("2025-06-10T09:00:00Z").is_some());
        assert!(parse_iso("2025-06-10T09:00:00+03:00").is_some());
        assert!(parse_iso("dün").is_none());

        let dt = parse_iso("2025-06-10T09:30:00").unwrap();
        assert_eq!(dt.format("%d.%m.%Y %H:%M").to_string(), "10.06.2025 09:30");
    }
}
