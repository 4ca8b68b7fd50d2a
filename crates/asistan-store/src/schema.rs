//! SQLite schema for the assistant's persistent collections.
//!
//! All timestamps are local-time ISO-8601 strings ("%Y-%m-%dT%H:%M:%S"),
//! which makes range scans plain lexicographic comparisons.

pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS notes (
    id            TEXT PRIMARY KEY,
    title         TEXT NOT NULL,
    content       TEXT NOT NULL,
    user_id       TEXT NOT NULL,
    is_voice_note INTEGER NOT NULL DEFAULT 0,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_notes_user ON notes(user_id, created_at DESC);

CREATE TABLE IF NOT EXISTS events (
    id          TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    description TEXT,
    start_time  TEXT NOT NULL,
    end_time    TEXT NOT NULL,
    user_id     TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_events_user_start ON events(user_id, start_time);
CREATE INDEX IF NOT EXISTS idx_events_start ON events(start_time);

CREATE TABLE IF NOT EXISTS reminders (
    id            TEXT PRIMARY KEY,
    title         TEXT NOT NULL,
    description   TEXT,
    reminder_time TEXT NOT NULL,
    user_id       TEXT NOT NULL,
    is_completed  INTEGER NOT NULL DEFAULT 0,
    created_at    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_reminders_user_time ON reminders(user_id, reminder_time);

CREATE TABLE IF NOT EXISTS chat_messages (
    id           TEXT PRIMARY KEY,
    user_id      TEXT NOT NULL,
    user_message TEXT NOT NULL,
    ai_response  TEXT NOT NULL,
    intent       TEXT NOT NULL,
    timestamp    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_chat_user_time ON chat_messages(user_id, timestamp DESC);

CREATE TABLE IF NOT EXISTS weather_cache (
    city       TEXT PRIMARY KEY,
    data_json  TEXT NOT NULL,
    cached_at  TEXT NOT NULL,
    expires_at TEXT NOT NULL
);
"#;
