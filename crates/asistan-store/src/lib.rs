//! Embedded SQLite store for the assistant's collections: notes, calendar
//! events, reminders, chat history and a short-lived weather cache.
//!
//! All timestamps are stored as local-time ISO 8601 strings
//! (`%Y-%m-%dT%H:%M:%S`), which keeps range queries lexicographic.

pub mod schema;
pub mod sqlite;
pub mod types;

pub use sqlite::{now_iso, parse_iso, AssistantStore};
pub use types::{CalendarEvent, ChatMessage, Note, Reminder};
