//! Turkish free-text date and time resolution.

use std::ops::Range;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::text::{collapse_ws, lower_tr};

/// Turkish month names, January first.
pub(crate) const MONTHS: [&str; 12] = [
    "ocak", "şubat", "mart", "nisan", "mayıs", "haziran",
    "temmuz", "ağustos", "eylül", "ekim", "kasım", "aralık",
];

static MONTH_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(\d{1,2})\s+(ocak|şubat|mart|nisan|mayıs|haziran|temmuz|ağustos|eylül|ekim|kasım|aralık)\b",
    )
    .unwrap()
});

static NUMERIC_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})[./](\d{1,2})(?:[./](\d{4}|\d{2}))?\b").unwrap());

static CLOCK_COLON_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{1,2}):(\d{2})\b").unwrap());
static CLOCK_DOT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{1,2})\.(\d{2})\b").unwrap());
static SAAT_HOUR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bsaat\s+(\d{1,2})\b").unwrap());
static HOUR_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})'?(?:d[ae]|t[ae]|[ae])\b").unwrap());

/// Phrase strippers for title cleaning. Order matters: clock expressions
/// with locative suffixes must go before the bare hour-suffix pattern, and
/// the lone "saat" cleanup must run last so "saat 14:00'te" leaves nothing
/// behind.
static STRIP_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b\d{1,2}\s+(?:ocak|şubat|mart|nisan|mayıs|haziran|temmuz|ağustos|eylül|ekim|kasım|aralık)\b",
        r"\b\d{1,2}[./]\d{1,2}(?:[./]\d{2,4})?\b",
        r"\b\d{1,2}[:.]\d{2}(?:'?\p{L}{1,4})?",
        r"\b\d{1,2}'?(?:d[ae]|t[ae]|[ae])\b",
        r"\bsaat\s+\d{1,2}\b",
        r"\b(?:yarın|bugün)\b",
        r"\bsaat\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Resolve the temporal expression in `message` against `now`.
///
/// Date precedence: named month ("21 haziran"), numeric date ("21.06",
/// "15/07/2025"), then "bugün"; everything else resolves to tomorrow.
/// The matched date span is blanked before the clock scan so day.month
/// digits are not re-read as hour.minute. Time precedence: H:MM, H.MM,
/// "saat H", suffixed hour ("10'da", "18e"); default 10:00.
pub fn resolve_datetime(message: &str, now: NaiveDateTime) -> NaiveDateTime {
    let lowered = lower_tr(message);
    let today = now.date();

    let mut masked = lowered.clone();
    let date = match named_month_date(&lowered, today).or_else(|| numeric_date(&lowered, today)) {
        Some((date, span)) => {
            blank_span(&mut masked, span);
            date
        }
        None if lowered.contains("bugün") => today,
        // "yarın" and the bare default both land on tomorrow
        None => today + Duration::days(1),
    };

    let time = scan_time(&masked).unwrap_or_else(default_time);
    NaiveDateTime::new(date, time)
}

/// Timestamp format used across the HTTP and storage layers.
pub fn to_iso(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

fn default_time() -> NaiveTime {
    NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default()
}

fn named_month_date(lowered: &str, today: NaiveDate) -> Option<(NaiveDate, Range<usize>)> {
    let caps = MONTH_DAY_RE.captures(lowered)?;
    let whole = caps.get(0)?;
    let day: u32 = caps.get(1)?.as_str().parse().ok()?;
    let month_name = caps.get(2)?.as_str();
    let month = MONTHS.iter().position(|m| *m == month_name)? as u32 + 1;
    let date = rolled_forward(day, month, today)?;
    Some((date, whole.range()))
}

fn numeric_date(lowered: &str, today: NaiveDate) -> Option<(NaiveDate, Range<usize>)> {
    let caps = NUMERIC_DATE_RE.captures(lowered)?;
    let whole = caps.get(0)?;
    let day: u32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    let date = match caps.get(3) {
        Some(year) => {
            let mut year: i32 = year.as_str().parse().ok()?;
            if year < 100 {
                year += 2000;
            }
            // An explicit year is taken literally, even in the past
            NaiveDate::from_ymd_opt(year, month, day)?
        }
        None => rolled_forward(day, month, today)?,
    };
    Some((date, whole.range()))
}

/// Build a date in the current year, rolling to the next year when the
/// result would lie strictly before `today`.
fn rolled_forward(day: u32, month: u32, today: NaiveDate) -> Option<NaiveDate> {
    let candidate = NaiveDate::from_ymd_opt(today.year(), month, day)?;
    if candidate < today {
        NaiveDate::from_ymd_opt(today.year() + 1, month, day)
    } else {
        Some(candidate)
    }
}

/// Blank a matched span in place. The replacement has the same byte length,
/// keeping later regex offsets valid.
fn blank_span(text: &mut String, span: Range<usize>) {
    let blank = " ".repeat(span.len());
    text.replace_range(span, &blank);
}

fn scan_time(text: &str) -> Option<NaiveTime> {
    hour_minute(&CLOCK_COLON_RE, text)
        .or_else(|| hour_minute(&CLOCK_DOT_RE, text))
        .or_else(|| bare_hour(&SAAT_HOUR_RE, text))
        .or_else(|| bare_hour(&HOUR_SUFFIX_RE, text))
}

fn hour_minute(re: &Regex, text: &str) -> Option<NaiveTime> {
    let caps = re.captures(text)?;
    let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = caps.get(2)?.as_str().parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn bare_hour(re: &Regex, text: &str) -> Option<NaiveTime> {
    let caps = re.captures(text)?;
    let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    NaiveTime::from_hms_opt(hour, 0, 0)
}

/// Remove every recognized temporal phrase. Used when cleaning titles.
pub(crate) fn strip_datetime_phrases(text: &str) -> String {
    let mut out = text.to_string();
    for re in STRIP_RES.iter() {
        out = re.replace_all(&out, " ").into_owned();
    }
    collapse_ws(&out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hh, mm, 0)
            .unwrap()
    }

    #[test]
    fn named_month_with_saat_hour() {
        let resolved = resolve_datetime("21 haziran saat 10'da toplantı", at(2025, 6, 1, 9, 0));
        assert_eq!(to_iso(resolved), "2025-06-21T10:00:00");
    }

    #[test]
    fn yarin_with_suffixed_hour() {
        let resolved = resolve_datetime(
            "İsmi sabah toplantısı olsun yarın saat 9'da",
            at(2025, 6, 10, 8, 0),
        );
        assert_eq!(to_iso(resolved), "2025-06-11T09:00:00");
    }

    #[test]
    fn bare_command_defaults_to_tomorrow_ten() {
        let resolved = resolve_datetime("toplantı kur", at(2025, 6, 10, 22, 30));
        assert_eq!(to_iso(resolved), "2025-06-11T10:00:00");
    }

    #[test]
    fn bugun_keeps_today() {
        let resolved = resolve_datetime("bugün 14:00 toplantı", at(2025, 6, 10, 8, 0));
        assert_eq!(to_iso(resolved), "2025-06-10T14:00:00");
    }

    #[test]
    fn past_month_day_rolls_to_next_year() {
        let resolved = resolve_datetime("15 ocak planlama", at(2025, 6, 10, 8, 0));
        assert_eq!(to_iso(resolved), "2026-01-15T10:00:00");
    }

    #[test]
    fn same_day_does_not_roll() {
        let resolved = resolve_datetime("10 haziran etkinliği", at(2025, 6, 10, 8, 0));
        assert_eq!(to_iso(resolved), "2025-06-10T10:00:00");
    }

    #[test]
    fn explicit_year_is_literal() {
        let resolved = resolve_datetime("15.07.2024 raporu", at(2026, 1, 1, 0, 0));
        assert_eq!(to_iso(resolved), "2024-07-15T10:00:00");
    }

    #[test]
    fn two_digit_year_maps_to_2000s() {
        let resolved = resolve_datetime("15/07/24 teslim", at(2025, 6, 10, 8, 0));
        assert_eq!(to_iso(resolved), "2024-07-15T10:00:00");
    }

    #[test]
    fn date_span_is_not_reread_as_clock() {
        // 21.06 is a date; the clock scan must pick up 9.30, not 21.06
        let resolved = resolve_datetime("21.06 saat 9.30'da görüşme", at(2025, 6, 1, 8, 0));
        assert_eq!(to_iso(resolved), "2025-06-21T09:30:00");
    }

    #[test]
    fn dotted_pair_with_invalid_month_is_a_clock() {
        let resolved = resolve_datetime("9.30'da kahvaltı", at(2025, 6, 10, 8, 0));
        assert_eq!(to_iso(resolved), "2025-06-11T09:30:00");
    }

    #[test]
    fn invalid_clock_falls_through_to_next_pattern() {
        let resolved = resolve_datetime("99:99 yerine saat 14 diyelim", at(2025, 6, 10, 8, 0));
        assert_eq!(to_iso(resolved), "2025-06-11T14:00:00");
    }

    #[test]
    fn suffixed_hour_without_saat() {
        let resolved = resolve_datetime("yarın 18'de maç", at(2025, 6, 10, 8, 0));
        assert_eq!(to_iso(resolved), "2025-06-11T18:00:00");
    }

    #[test]
    fn impossible_named_date_is_ignored() {
        // 2025 has no Feb 29; the date branch is skipped entirely
        let resolved = resolve_datetime("29 şubat planı", at(2025, 1, 10, 8, 0));
        assert_eq!(to_iso(resolved), "2025-01-11T10:00:00");
    }

    #[test]
    fn strips_clock_and_saat_completely() {
        assert_eq!(
            strip_datetime_phrases("yarın saat 14:00'te takım"),
            "takım"
        );
        assert_eq!(
            strip_datetime_phrases("21 haziran saat 10'da toplantı"),
            "toplantı"
        );
    }

    #[test]
    fn strip_keeps_day_part_words() {
        assert_eq!(strip_datetime_phrases("sabah yürüyüşü"), "sabah yürüyüşü");
    }
}
