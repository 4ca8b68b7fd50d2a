//! Event title extraction: an ordered cascade from explicit labels down to
//! loose fallbacks. Every pattern produces a candidate; the first candidate
//! that survives cleaning becomes the title.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::datetime::{strip_datetime_phrases, MONTHS};
use crate::text::{collapse_ws, lower_tr, title_case_tr};

/// Used when no candidate survives cleaning.
pub const FALLBACK_TITLE: &str = "Yeni Toplantı";

/// Words that only ever describe a part of the day.
const DAY_PARTS: &[&str] = &["sabah", "öğle", "öğlen", "öğleden", "akşam", "gece"];

/// Exact tokens dropped from possessive captures.
const CAPTION_FILLERS: &[&str] = &[
    "saat", "da", "de", "a", "e", "ve", "ile", "bir", "olsun", "oluştur",
    "kur", "yap", "toplantı", "etkinlik", "yarın", "bugün",
];

/// The leading-words fallback skips these on top of day parts, month names
/// and digit-bearing tokens.
const FALLBACK_STOPWORDS: &[&str] = &[
    "oluştur", "kur", "ekle", "yap", "planla", "ayarla", "al", "et",
    "bir", "için", "lütfen", "olsun", "ve", "ile", "de", "da",
    "bu", "şu", "o", "mi", "mı", "mu", "mü",
];

const TIME_TOKENS: &[&str] = &["saat", "yarın", "bugün", "sonra", "önce"];

static LABEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"başlık\s*:\s*(.+)").unwrap());
static LABEL_CUT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:açıklama|detay|not|hakkında|içerik)\b").unwrap());

/// "... olsun" naming constructions, most specific first.
static POSSESSIVE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"başlığının\s+ismi\s+(.+?)\s+olsun",
        r"başlığı\s+(.+?)\s+olsun",
        r"ismi\s+(.+?)\s+olsun",
        r"konusu\s+(.+?)\s+olsun",
        r"(.+?)\s+toplantısı\s+olsun",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Structural shapes around "toplantı"/"etkinlik", most specific first.
/// The bare compound form keeps its noun ("takım toplantısı" names the
/// whole meeting), matching how possessive captures behave.
static STRUCTURAL_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(.+?)\s+başlıklı\s+(?:toplantı|etkinlik)",
        r"(.+?\s+toplantısı)\b",
        r"toplantı\s+oluştur\s+(.+)",
        r"etkinlik\s+oluştur\s+(.+)",
        r"(.+?)\s+için\s+toplantı",
        r"(.+?)\s+adlı\s+toplantı",
        r"(.+?)\s+isimli\s+toplantı",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Command fillers removed from a surviving candidate. Deliberately does
/// not include "toplantı"/"etkinlik": captures like "sabah toplantısı"
/// keep their noun.
static TITLE_STRIP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:oluştur|kur|ekle|yap|planla|ayarla|al|olsun|lütfen|bir|için)\b").unwrap()
});

/// Extract an event title from the message.
pub fn extract_title(message: &str) -> String {
    let lowered = lower_tr(message);
    for candidate in candidates(&lowered) {
        if let Some(title) = clean_title(&candidate) {
            return title;
        }
    }
    FALLBACK_TITLE.to_string()
}

/// All candidates in priority order: explicit label, possessive naming,
/// structural shapes, then the first meaningful words of the message.
fn candidates(lowered: &str) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(c) = label_title(lowered) {
        out.push(c);
    }
    for re in POSSESSIVE_RES.iter() {
        if let Some(c) = re
            .captures(lowered)
            .and_then(|caps| caps.get(1).map(|m| m.as_str().to_string()))
            .and_then(|raw| filter_caption_tokens(&raw))
        {
            out.push(c);
        }
    }
    for re in STRUCTURAL_RES.iter() {
        if let Some(m) = re.captures(lowered).and_then(|caps| caps.get(1)) {
            let raw = m.as_str().trim();
            if !raw.is_empty() {
                out.push(raw.to_string());
            }
        }
    }
    if let Some(c) = leading_words_title(lowered) {
        out.push(c);
    }
    out
}

fn label_title(lowered: &str) -> Option<String> {
    let caps = LABEL_RE.captures(lowered)?;
    let tail = caps.get(1)?.as_str();
    let cut = LABEL_CUT_RE
        .find(tail)
        .map(|m| &tail[..m.start()])
        .unwrap_or(tail);
    let cut = cut.trim().trim_end_matches([',', ';', '.', ':']).trim();
    (!cut.is_empty()).then(|| cut.to_string())
}

/// Keep name-bearing tokens from a possessive capture: fillers and
/// digit-bearing tokens are dropped, day-part words only when they sit
/// next to a clock-like token ("sabah toplantısı" keeps its "sabah",
/// "sabah 9'da" loses it).
fn filter_caption_tokens(capture: &str) -> Option<String> {
    let tokens: Vec<&str> = capture
        .split_whitespace()
        .map(trim_punctuation)
        .filter(|t| !t.is_empty())
        .collect();

    let mut kept: Vec<&str> = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        if token.chars().any(|c| c.is_ascii_digit()) {
            continue;
        }
        if CAPTION_FILLERS.contains(token) {
            continue;
        }
        if DAY_PARTS.contains(token) && next_to_clock_token(&tokens, i) {
            continue;
        }
        kept.push(token);
    }

    (!kept.is_empty()).then(|| kept.join(" "))
}

fn next_to_clock_token(tokens: &[&str], i: usize) -> bool {
    let clockish = |t: &str| {
        t.chars().any(|c| c.is_ascii_digit()) || matches!(t, "saat" | "yarın" | "bugün")
    };
    let before = i
        .checked_sub(1)
        .map(|j| clockish(tokens[j]))
        .unwrap_or(false);
    let after = tokens.get(i + 1).map(|t| clockish(t)).unwrap_or(false);
    before || after
}

/// First three meaningful words of the message. Skipped tokens do not stop
/// the scan, so "21 haziran saat 10'da toplantı" still yields "toplantı".
fn leading_words_title(lowered: &str) -> Option<String> {
    let mut kept: Vec<&str> = Vec::new();
    for raw in lowered.split_whitespace() {
        let token = trim_punctuation(raw);
        if token.is_empty() || token.chars().any(|c| c.is_ascii_digit()) {
            continue;
        }
        if FALLBACK_STOPWORDS.contains(&token)
            || TIME_TOKENS.contains(&token)
            || DAY_PARTS.contains(&token)
            || MONTHS.contains(&token)
        {
            continue;
        }
        kept.push(token);
        if kept.len() == 3 {
            break;
        }
    }
    (!kept.is_empty()).then(|| kept.join(" "))
}

fn trim_punctuation(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
}

/// Normalize a candidate: drop clock-adjacent day parts, strip temporal
/// phrases and command fillers, title-case the rest. Candidates shorter
/// than two characters are rejected so the cascade can continue.
fn clean_title(raw: &str) -> Option<String> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let mut kept: Vec<&str> = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        if DAY_PARTS.contains(token) && next_to_clock_token(&tokens, i) {
            continue;
        }
        kept.push(token);
    }

    let no_dates = strip_datetime_phrases(&kept.join(" "));
    let stripped = TITLE_STRIP_RE.replace_all(&no_dates, " ");
    let collapsed = collapse_ws(&stripped);
    let trimmed = collapsed
        .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
        .trim();

    if trimmed.chars().count() < 2 {
        None
    } else {
        Some(title_case_tr(trimmed))
    }
}
