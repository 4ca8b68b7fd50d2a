//! Classification and slot types shared across the pipeline.

use serde::{Deserialize, Serialize};

/// Coarse action category inferred from a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Chat,
    Note,
    Calendar,
    Weather,
    Reminder,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Chat => "chat",
            Intent::Note => "note",
            Intent::Calendar => "calendar",
            Intent::Weather => "weather",
            Intent::Reminder => "reminder",
        }
    }
}

/// Structured slots pulled out of a message. `None` means "not determined";
/// an empty string is a present, deliberate value (a calendar entry may have
/// an empty description).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityBag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EntityBag {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.datetime.is_none()
            && self.location.is_none()
            && self.description.is_none()
    }

    /// Drop fields that are present but blank.
    pub fn pruned(self) -> EntityBag {
        fn keep(v: Option<String>) -> Option<String> {
            v.filter(|s| !s.trim().is_empty())
        }
        EntityBag {
            title: keep(self.title),
            content: keep(self.content),
            datetime: keep(self.datetime),
            location: keep(self.location),
            description: keep(self.description),
        }
    }

    /// Field-wise merge: keep `self` where present and non-blank, fill the
    /// gaps from `fallback`.
    pub fn merged_with(self, fallback: EntityBag) -> EntityBag {
        fn pick(primary: Option<String>, fallback: Option<String>) -> Option<String> {
            match primary {
                Some(v) if !v.trim().is_empty() => Some(v),
                _ => fallback,
            }
        }
        EntityBag {
            title: pick(self.title, fallback.title),
            content: pick(self.content, fallback.content),
            datetime: pick(self.datetime, fallback.datetime),
            location: pick(self.location, fallback.location),
            description: pick(self.description, fallback.description),
        }
    }
}

/// Classification outcome for one message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentResult {
    pub intent: Intent,
    pub confidence: f64,
    #[serde(default)]
    pub entities: EntityBag,
}

impl IntentResult {
    pub fn new(intent: Intent, confidence: f64) -> Self {
        Self {
            intent,
            confidence,
            entities: EntityBag::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Intent::Calendar).unwrap(), "\"calendar\"");
        let parsed: Intent = serde_json::from_str("\"note\"").unwrap();
        assert_eq!(parsed, Intent::Note);
    }

    #[test]
    fn unknown_intent_is_rejected() {
        assert!(serde_json::from_str::<Intent>("\"alarm\"").is_err());
    }

    #[test]
    fn empty_fields_are_skipped_in_json() {
        let result = IntentResult::new(Intent::Chat, 0.5);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["intent"], "chat");
        assert_eq!(json["entities"], serde_json::json!({}));
    }

    #[test]
    fn result_parses_without_entities() {
        let raw = r#"{"intent": "weather", "confidence": 0.85}"#;
        let parsed: IntentResult = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.intent, Intent::Weather);
        assert!(parsed.entities.is_empty());
    }

    #[test]
    fn merge_prefers_non_blank_primary() {
        let primary = EntityBag {
            title: Some("Toplantı".into()),
            datetime: Some(" ".into()),
            ..Default::default()
        };
        let fallback = EntityBag {
            title: Some("Yedek".into()),
            datetime: Some("2025-06-11T09:00:00".into()),
            content: Some("içerik".into()),
            ..Default::default()
        };
        let merged = primary.merged_with(fallback);
        assert_eq!(merged.title.as_deref(), Some("Toplantı"));
        assert_eq!(merged.datetime.as_deref(), Some("2025-06-11T09:00:00"));
        assert_eq!(merged.content.as_deref(), Some("içerik"));
    }

    #[test]
    fn pruned_drops_blank_values() {
        let bag = EntityBag {
            title: Some("".into()),
            location: Some("İzmir".into()),
            ..Default::default()
        };
        let pruned = bag.pruned();
        assert!(pruned.title.is_none());
        assert_eq!(pruned.location.as_deref(), Some("İzmir"));
    }
}
