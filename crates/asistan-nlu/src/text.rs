//! Turkish-aware text helpers.
//!
//! Unicode default casing maps the Turkish dotted/dotless I pair wrong
//! ('I' would lowercase to 'i'), so all casing in this crate goes through
//! single-character maps that special-case the four I forms. The maps are
//! one character in, one character out, which lets byte spans found in a
//! lowered copy be mapped back onto the original text.

use std::ops::Range;

fn lower_char_tr(c: char) -> char {
    match c {
        'İ' => 'i',
        'I' => 'ı',
        _ => c.to_lowercase().next().unwrap_or(c),
    }
}

fn upper_char_tr(c: char) -> char {
    match c {
        'i' => 'İ',
        'ı' => 'I',
        _ => c.to_uppercase().next().unwrap_or(c),
    }
}

/// Lowercase with Turkish I handling. Character count is preserved.
pub fn lower_tr(s: &str) -> String {
    s.chars().map(lower_char_tr).collect()
}

/// Capitalize one word: first character up, the rest down. Apostrophe
/// suffixes stay attached ("eren'in" becomes "Eren'in").
pub fn capitalize_tr(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(word.len());
            out.push(upper_char_tr(first));
            out.extend(chars.map(lower_char_tr));
            out
        }
        None => String::new(),
    }
}

/// Title-case every whitespace-separated word.
pub fn title_case_tr(s: &str) -> String {
    s.split_whitespace()
        .map(capitalize_tr)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapse whitespace runs into single spaces and trim the ends.
pub fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove whole-word occurrences of the given lowercase phrases, matching
/// case-insensitively while keeping the casing of the surviving text.
/// Overlapping phrases must be listed longest first.
pub fn strip_phrases(text: &str, phrases: &[&str]) -> String {
    let mut chars: Vec<char> = text.chars().collect();
    let mut lowered: Vec<char> = text.chars().map(lower_char_tr).collect();

    for phrase in phrases {
        let needle: Vec<char> = phrase.chars().collect();
        if needle.is_empty() {
            continue;
        }
        let mut i = 0;
        while i + needle.len() <= lowered.len() {
            if lowered[i..i + needle.len()] == needle[..]
                && boundary_before(&lowered, i)
                && boundary_after(&lowered, i + needle.len())
            {
                for slot in i..i + needle.len() {
                    chars[slot] = ' ';
                    lowered[slot] = ' ';
                }
                i += needle.len();
            } else {
                i += 1;
            }
        }
    }

    collapse_ws(&chars.iter().collect::<String>())
}

fn boundary_before(chars: &[char], i: usize) -> bool {
    i == 0 || !chars[i - 1].is_alphanumeric()
}

fn boundary_after(chars: &[char], i: usize) -> bool {
    i >= chars.len() || !chars[i].is_alphanumeric()
}

/// Map a byte range of `lowered` (a character-for-character lowering of
/// `original`) back onto `original`, returning the covered text with its
/// source casing intact.
pub fn span_from_lowered(original: &str, lowered: &str, range: Range<usize>) -> String {
    let start = lowered[..range.start].chars().count();
    let len = lowered[range.start..range.end].chars().count();
    original.chars().skip(start).take(len).collect()
}
