//! HTTP client for Google's Generative Language API.

use reqwest::Client;
use serde_json::json;
use tracing::{debug, error};

use asistan_core::{Error, Result};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Shown when the model replies with empty text.
const EMPTY_REPLY: &str = "Üzgünüm, şu anda yanıt üretemiyorum. Lütfen tekrar deneyin.";

/// Shown when the API call fails.
const FAILED_REPLY: &str = "Üzgünüm, bir hata oluştu. Lütfen daha sonra tekrar deneyin.";

#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: Option<String>,
    model: String,
}

impl GeminiClient {
    pub fn new(http: Client, api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            http,
            api_key,
            model: model.into(),
        }
    }

    /// False when no API key was configured; callers degrade to canned text.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// One generateContent round trip, returning the first candidate's text.
    pub(crate) async fn generate_content(&self, prompt: &str) -> Result<String> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Config("GEMINI_API_KEY is not set".into()))?;
        let url = format!("{}/{}:generateContent?key={}", API_BASE, self.model, key);

        let body = json!({
            "contents": [{"parts": [{"text": prompt}]}],
            "generationConfig": {
                "temperature": 0.7,
                "topP": 0.8,
                "topK": 40,
                "maxOutputTokens": 1024,
            },
            "safetySettings": [
                {"category": "HARM_CATEGORY_HARASSMENT", "threshold": "BLOCK_MEDIUM_AND_ABOVE"},
                {"category": "HARM_CATEGORY_HATE_SPEECH", "threshold": "BLOCK_MEDIUM_AND_ABOVE"},
                {"category": "HARM_CATEGORY_SEXUALLY_EXPLICIT", "threshold": "BLOCK_MEDIUM_AND_ABOVE"},
                {"category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": "BLOCK_MEDIUM_AND_ABOVE"},
            ],
        });

        debug!("Querying {} with a {} char prompt", self.model, prompt.chars().count());

        let response = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            // without_url: the URL carries the API key
            .map_err(|e| Error::Http(format!("Request failed: {}", e.without_url())))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Http(format!("API error {}: {}", status, body)));
        }

        let parsed: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Http(format!("Invalid response body: {}", e.without_url())))?;
        let text = parsed["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .unwrap_or_default()
            .trim()
            .to_string();
        Ok(text)
    }

    /// Conversational answer; never fails. API trouble degrades to an
    /// apology so the chat endpoint stays available.
    pub async fn generate_response(&self, message: &str, context: Option<&str>) -> String {
        let prompt = crate::prompts::chat_prompt(message, context);
        match self.generate_content(&prompt).await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => EMPTY_REPLY.to_string(),
            Err(e) => {
                error!("Gemini API error: {}", e);
                FAILED_REPLY.to_string()
            }
        }
    }
}
