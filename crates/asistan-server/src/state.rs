//! Shared application state.

use asistan_core::AsistanConfig;
use asistan_gemini::{GeminiClient, GenerativeClassifier};
use asistan_nlu::{FallbackClassifier, RuleBasedClassifier};
use asistan_store::AssistantStore;
use asistan_weather::WeatherClient;

/// Intent classifier chain: regex rules first, generative escalation for
/// low-confidence messages.
pub type IntentClassifier = FallbackClassifier<RuleBasedClassifier, GenerativeClassifier>;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: AsistanConfig,
    pub store: AssistantStore,
    pub gemini: GeminiClient,
    pub weather: WeatherClient,
    pub classifier: IntentClassifier,
}

impl AppState {
    pub fn new(
        config: AsistanConfig,
        store: AssistantStore,
        gemini: GeminiClient,
        weather: WeatherClient,
    ) -> Self {
        let classifier = FallbackClassifier::new(
            RuleBasedClassifier,
            GenerativeClassifier::new(gemini.clone()),
        );
        Self {
            config,
            store,
            gemini,
            weather,
            classifier,
        }
    }
}
