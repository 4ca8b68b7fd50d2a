//! Intent classification: keyword tables first, generative escalation second.

use tracing::debug;

use crate::text::lower_tr;
use crate::types::{Intent, IntentResult};

/// Confidence assigned to keyword matches.
const RULE_CONFIDENCE: f64 = 0.9;

/// Confidence of the default chat result, below the escalation threshold.
const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Rule results at or above this confidence skip the generative classifier.
pub const ESCALATION_THRESHOLD: f64 = 0.8;

/// Question phrases short-circuit to chat so queries about events or the
/// weather are not mistaken for creation commands.
const QUESTION_PATTERNS: &[&str] = &[
    "var mı", "var mi", "ne zaman", "kaçta", "saat kaçta", "nasıl", "nedir",
    "neler", "kim", "nerede", "hangi",
];

const NOTE_KEYWORDS: &[&str] = &[
    "not al", "kaydet", "not et", "not olarak", "not ekle", "not olarak ekle",
    "not kaydet", "not oluştur", "not yaz", "not tut", "bunu not", "notu kaydet",
];

const CALENDAR_KEYWORDS: &[&str] = &[
    "etkinlik", "toplantı", "randevu", "takvim", "etkinlik oluştur", "toplantı kur",
];

const WEATHER_KEYWORDS: &[&str] = &["hava durumu", "hava"];

/// Keyword-table classification. The category order (note, calendar,
/// weather) is load-bearing: a message matching several tables resolves
/// to the first. Entities stay empty here; slot extraction runs later
/// against the final intent.
pub fn classify_rules(message: &str) -> IntentResult {
    let lowered = lower_tr(message);

    if QUESTION_PATTERNS.iter().any(|p| lowered.contains(p)) {
        return IntentResult::new(Intent::Chat, RULE_CONFIDENCE);
    }

    let tables: [(&[&str], Intent); 3] = [
        (NOTE_KEYWORDS, Intent::Note),
        (CALENDAR_KEYWORDS, Intent::Calendar),
        (WEATHER_KEYWORDS, Intent::Weather),
    ];
    for (keywords, intent) in tables {
        if keywords.iter().any(|k| lowered.contains(k)) {
            return IntentResult::new(intent, RULE_CONFIDENCE);
        }
    }

    IntentResult::new(Intent::Chat, DEFAULT_CONFIDENCE)
}

/// True when the message carries an explicit note trigger.
pub fn contains_note_keyword(message: &str) -> bool {
    let lowered = lower_tr(message);
    NOTE_KEYWORDS.iter().any(|k| lowered.contains(k))
}

/// True when the message carries an explicit calendar trigger.
pub fn contains_calendar_keyword(message: &str) -> bool {
    let lowered = lower_tr(message);
    CALENDAR_KEYWORDS.iter().any(|k| lowered.contains(k))
}

/// Strategy interface over intent classification.
#[allow(async_fn_in_trait)]
pub trait Classifier {
    async fn classify(&self, message: &str) -> IntentResult;
}

/// Deterministic keyword classifier. No I/O, never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedClassifier;

impl Classifier for RuleBasedClassifier {
    async fn classify(&self, message: &str) -> IntentResult {
        classify_rules(message)
    }
}

/// Tries `primary` and consults `secondary` only below the confidence
/// threshold. A secondary result with confidence 0.0 signals failure and
/// keeps the primary result.
pub struct FallbackClassifier<P, S> {
    primary: P,
    secondary: S,
    threshold: f64,
}

impl<P, S> FallbackClassifier<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self {
            primary,
            secondary,
            threshold: ESCALATION_THRESHOLD,
        }
    }
}

impl<P: Classifier, S: Classifier> Classifier for FallbackClassifier<P, S> {
    async fn classify(&self, message: &str) -> IntentResult {
        let primary = self.primary.classify(message).await;
        if primary.confidence >= self.threshold {
            return primary;
        }
        debug!(
            confidence = primary.confidence,
            "rule classification uncertain, escalating"
        );
        let secondary = self.secondary.classify(message).await;
        if secondary.confidence > 0.0 {
            secondary
        } else {
            primary
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn questions_resolve_to_chat() {
        let result = classify_rules("Yarın toplantım var mı?");
        assert_eq!(result.intent, Intent::Chat);
        assert_eq!(result.confidence, 0.9);
    }

    #[test]
    fn note_keywords_win_over_calendar() {
        let result = classify_rules("Toplantı kararlarını not olarak ekle");
        assert_eq!(result.intent, Intent::Note);
    }

    #[test]
    fn calendar_keywords_are_detected() {
        let result = classify_rules("21 haziran saat 10'da toplantı");
        assert_eq!(result.intent, Intent::Calendar);
        assert_eq!(result.confidence, 0.9);
    }

    #[test]
    fn weather_keywords_are_detected() {
        assert_eq!(classify_rules("Ankara hava durumu").intent, Intent::Weather);
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        assert_eq!(classify_rules("BUNU NOT AL").intent, Intent::Note);
    }

    #[test]
    fn plain_chat_scores_below_threshold() {
        let result = classify_rules("merhaba");
        assert_eq!(result.intent, Intent::Chat);
        assert!(result.confidence < ESCALATION_THRESHOLD);
    }

    #[test]
    fn question_phrase_matches_inside_words() {
        // "nasılsın" contains "nasıl"; substring containment is intended
        let result = classify_rules("nasılsın bakalım");
        assert_eq!(result.intent, Intent::Chat);
        assert_eq!(result.confidence, 0.9);
    }

    #[test]
    fn keyword_helpers_match_their_tables() {
        assert!(contains_note_keyword("şunu kaydet"));
        assert!(!contains_note_keyword("merhaba"));
        assert!(contains_calendar_keyword("yarın randevu var"));
        assert!(!contains_calendar_keyword("süt al"));
    }

    struct Fixed(IntentResult);

    impl Classifier for Fixed {
        async fn classify(&self, _message: &str) -> IntentResult {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn fallback_keeps_confident_primary() {
        let chain = FallbackClassifier::new(
            Fixed(IntentResult::new(Intent::Note, 0.9)),
            Fixed(IntentResult::new(Intent::Weather, 1.0)),
        );
        assert_eq!(chain.classify("x").await.intent, Intent::Note);
    }

    #[tokio::test]
    async fn fallback_escalates_uncertain_primary() {
        let chain = FallbackClassifier::new(
            Fixed(IntentResult::new(Intent::Chat, 0.5)),
            Fixed(IntentResult::new(Intent::Reminder, 0.95)),
        );
        assert_eq!(chain.classify("x").await.intent, Intent::Reminder);
    }

    #[tokio::test]
    async fn fallback_survives_failed_secondary() {
        let chain = FallbackClassifier::new(
            Fixed(IntentResult::new(Intent::Chat, 0.5)),
            Fixed(IntentResult::new(Intent::Chat, 0.0)),
        );
        let result = chain.classify("x").await;
        assert_eq!(result.confidence, 0.5);
    }
}
