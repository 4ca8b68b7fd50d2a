//! Per-intent slot orchestration.

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::datetime;
use crate::description;
use crate::text::{capitalize_tr, lower_tr, span_from_lowered, strip_phrases, title_case_tr};
use crate::title;
use crate::types::{EntityBag, Intent};

/// Used when a note has no recognizable title.
pub const FALLBACK_NOTE_TITLE: &str = "Yeni Not";

const NOTE_TITLE_MAX: usize = 50;
const NOTE_REMAINDER_MAX: usize = 30;

/// Trigger phrases removed when deriving a note title from command text.
/// Longer phrases precede their substrings.
const NOTE_TRIGGERS: &[&str] = &[
    "not olarak ekle", "not olarak kaydet", "bunu not al", "not olarak",
    "not oluştur", "notu kaydet", "not kaydet", "not ekle", "not yaz",
    "not tut", "bunu not", "not al", "not et", "kaydet", "ekle",
];

/// Cities recognized without a geocoding call.
const KNOWN_CITIES: &[&str] = &[
    "istanbul", "ankara", "izmir", "bursa", "antalya", "adana", "konya", "gaziantep",
];

static NOTE_LABEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"başlık\s*:\s*(.+)").unwrap());
static CONTENT_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:açıklama|içerik)\s*:\s*(.+)").unwrap());
static LABEL_CUT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:açıklama|detay|not|hakkında|içerik)\b").unwrap());

/// Spoken note forms: title span first, content span second.
static SPOKEN_NOTE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"başlık\s+(.+?)\s+içerik\s+(.+)",
        r"ismi\s+(.+?)\s+içerik\s+(.+)",
        r"başlığı\s+(.+?)\s+olsun\s+yapılacaklar\s+(.+)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Build the slot bag for a classified message.
pub fn extract_entities(message: &str, intent: Intent, now: NaiveDateTime) -> EntityBag {
    match intent {
        Intent::Note => note_entities(message),
        Intent::Calendar => calendar_entities(message, now),
        _ => EntityBag::default(),
    }
}

/// Detect a known city mentioned anywhere in the message.
pub fn detect_city(message: &str) -> Option<String> {
    let lowered = lower_tr(message);
    KNOWN_CITIES
        .iter()
        .find(|city| lowered.contains(*city))
        .map(|city| capitalize_tr(city))
}

fn calendar_entities(message: &str, now: NaiveDateTime) -> EntityBag {
    EntityBag {
        title: Some(title::extract_title(message)),
        datetime: Some(datetime::to_iso(datetime::resolve_datetime(message, now))),
        // always present for calendar, even when empty
        description: Some(description::extract_description(message)),
        ..Default::default()
    }
}

fn note_entities(message: &str) -> EntityBag {
    let lowered = lower_tr(message);

    // "başlık: X [açıklama/içerik: Y]"
    if let Some(m) = NOTE_LABEL_RE.captures(&lowered).and_then(|c| c.get(1)) {
        let tail = m.as_str();
        let cut = LABEL_CUT_RE
            .find(tail)
            .map(|c| &tail[..c.start()])
            .unwrap_or(tail);
        let title = cut.trim().trim_end_matches([',', ';', '.', ':']).trim();
        if !title.is_empty() {
            let content = CONTENT_LABEL_RE
                .captures(&lowered)
                .and_then(|c| c.get(1))
                .map(|m| span_from_lowered(message, &lowered, m.range()).trim().to_string())
                .unwrap_or_else(|| message.trim().to_string());
            return note_bag(title_case_tr(title), content);
        }
    }

    // "trigger phrase: content" split on the first colon
    if let Some(idx) = message.find(':') {
        let left = message[..idx].trim();
        let right = message[idx + 1..].trim();
        if !right.is_empty() {
            let cleaned = strip_phrases(left, NOTE_TRIGGERS);
            let title = if cleaned.trim().is_empty() {
                truncate_chars(right, NOTE_REMAINDER_MAX)
            } else {
                cleaned
            };
            return note_bag(title_case_tr(&title), right.to_string());
        }
    }

    // spoken two-field templates
    for re in SPOKEN_NOTE_RES.iter() {
        if let Some(caps) = re.captures(&lowered) {
            if let (Some(t), Some(c)) = (caps.get(1), caps.get(2)) {
                let title = strip_phrases(t.as_str(), &["olsun"]);
                let content = span_from_lowered(message, &lowered, c.range());
                if !title.trim().is_empty() {
                    return note_bag(title_case_tr(&title), content.trim().to_string());
                }
            }
        }
    }

    // remainder after removing trigger phrases serves as title and content
    let remainder = strip_phrases(message, NOTE_TRIGGERS);
    if remainder.chars().count() > 2 {
        let title = title_case_tr(&truncate_chars(&remainder, NOTE_REMAINDER_MAX));
        return note_bag(title, remainder);
    }

    note_bag(FALLBACK_NOTE_TITLE.to_string(), message.trim().to_string())
}

fn note_bag(title: String, content: String) -> EntityBag {
    EntityBag {
        title: Some(truncate_chars(&title, NOTE_TITLE_MAX)),
        content: Some(content),
        ..Default::default()
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head.trim_end())
    }
}
