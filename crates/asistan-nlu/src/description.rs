//! Description extraction from explicit label phrases.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::text::{lower_tr, span_from_lowered, strip_phrases};

/// Label patterns in fixed priority order. The "not" form requires its
/// colon; without one it would swallow every note-trigger sentence.
static DESCRIPTION_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"açıklama(?:sı)?\s*:?\s*(.+)",
        r"detay(?:ları|lar|ı)?\s*:?\s*(.+)",
        r"\bnot(?:u)?\s*:\s*(.+)",
        r"hakkında\s*:?\s*(.+)",
        r"içerik\s*:?\s*(.+)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Action verbs that terminate a description clause.
static VERB_CUT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:oluştur|yap|koy|kaydet|ekle)\b").unwrap());

const DESCRIPTION_FILLERS: &[&str] = &["toplantı", "etkinlik", "randevu", "olsun", "lütfen", "için"];

/// Pull the explanatory clause out of a message. Returns an empty string
/// when no label is present; callers treat that as a valid description.
pub fn extract_description(message: &str) -> String {
    let lowered = lower_tr(message);
    for re in DESCRIPTION_RES.iter() {
        if let Some(m) = re.captures(&lowered).and_then(|caps| caps.get(1)) {
            let tail = span_from_lowered(message, &lowered, m.range());
            let cleaned = clean_description(&tail);
            if cleaned.chars().count() > 2 {
                return cleaned;
            }
        }
    }
    String::new()
}

fn clean_description(tail: &str) -> String {
    let lowered = lower_tr(tail);
    let head: String = match VERB_CUT_RE.find(&lowered) {
        Some(v) => {
            let chars = lowered[..v.start()].chars().count();
            tail.chars().take(chars).collect()
        }
        None => tail.to_string(),
    };
    strip_phrases(&head, DESCRIPTION_FILLERS)
}
