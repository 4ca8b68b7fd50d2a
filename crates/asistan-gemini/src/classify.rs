//! Generative intent classification behind the rules' escalation path.

use chrono::Local;
use tracing::warn;

use asistan_nlu::{Classifier, Intent, IntentResult};

use crate::client::GeminiClient;
use crate::prompts;

/// Asks the model for a constrained JSON verdict about a message.
pub struct GenerativeClassifier {
    client: GeminiClient,
}

impl GenerativeClassifier {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

impl Classifier for GenerativeClassifier {
    async fn classify(&self, message: &str) -> IntentResult {
        if !self.client.is_configured() {
            return failed_result();
        }
        let prompt = prompts::intent_prompt(message, Local::now().date_naive());
        match self.client.generate_content(&prompt).await {
            Ok(reply) => parse_intent_reply(&reply).unwrap_or_else(failed_result),
            Err(e) => {
                warn!("Intent analysis error: {}", e);
                failed_result()
            }
        }
    }
}

/// Confidence 0.0 tells the fallback chain to keep the rule-based result.
fn failed_result() -> IntentResult {
    IntentResult::new(Intent::Chat, 0.0)
}

/// Parse the model's JSON verdict, tolerating Markdown code fences,
/// out-of-range confidence values and blank entity strings.
fn parse_intent_reply(raw: &str) -> Option<IntentResult> {
    let cleaned = raw
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    let mut result: IntentResult = serde_json::from_str(cleaned).ok()?;
    result.confidence = result.confidence.clamp(0.0, 1.0);
    result.entities = result.entities.pruned();
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_json_reply_parses() {
        let raw = r#"{"intent": "note", "confidence": 0.95, "entities": {"title": "Market"}}"#;
        let result = parse_intent_reply(raw).unwrap();
        assert_eq!(result.intent, Intent::Note);
        assert_eq!(result.confidence, 0.95);
        assert_eq!(result.entities.title.as_deref(), Some("Market"));
    }

    #[test]
    fn fenced_reply_parses() {
        let raw = "```json\n{\"intent\": \"calendar\", \"confidence\": 0.9, \"entities\": {}}\n```";
        let result = parse_intent_reply(raw).unwrap();
        assert_eq!(result.intent, Intent::Calendar);
    }

    #[test]
    fn confidence_is_clamped() {
        let raw = r#"{"intent": "weather", "confidence": 1.7, "entities": {}}"#;
        assert_eq!(parse_intent_reply(raw).unwrap().confidence, 1.0);
    }

    #[test]
    fn blank_entities_are_pruned() {
        let raw = r#"{"intent": "note", "confidence": 0.9, "entities": {"title": "  ", "location": "İzmir"}}"#;
        let result = parse_intent_reply(raw).unwrap();
        assert!(result.entities.title.is_none());
        assert_eq!(result.entities.location.as_deref(), Some("İzmir"));
    }

    #[test]
    fn prose_reply_is_rejected() {
        assert!(parse_intent_reply("Tabii, bunu not olarak kaydettim.").is_none());
    }

    #[test]
    fn unknown_intent_is_rejected() {
        let raw = r#"{"intent": "alarm", "confidence": 0.9, "entities": {}}"#;
        assert!(parse_intent_reply(raw).is_none());
    }
}
