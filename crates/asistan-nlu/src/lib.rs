//! Turkish intent classification and slot extraction.
//!
//! The pipeline is a fixed-order cascade: keyword tables decide the intent,
//! regex pattern tables pull title, description and datetime slots out of
//! the message, and a generative classifier is consulted only when the
//! rules are not confident. Every path is deterministic and infallible;
//! unrecognizable input degrades to literal fallbacks instead of errors.

pub mod datetime;
pub mod description;
pub mod extract;
pub mod intent;
pub mod text;
pub mod title;
pub mod types;

pub use datetime::{resolve_datetime, to_iso};
pub use description::extract_description;
pub use extract::{detect_city, extract_entities, FALLBACK_NOTE_TITLE};
pub use intent::{
    classify_rules, contains_calendar_keyword, contains_note_keyword, Classifier,
    FallbackClassifier, RuleBasedClassifier, ESCALATION_THRESHOLD,
};
pub use title::{extract_title, FALLBACK_TITLE};
pub use types::{EntityBag, Intent, IntentResult};
