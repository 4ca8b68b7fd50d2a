//! Gemini collaborator: conversational replies and generative intent
//! classification, degrading gracefully when the API is unreachable or
//! unconfigured.

pub mod classify;
pub mod client;
pub mod prompts;

pub use classify::GenerativeClassifier;
pub use client::GeminiClient;
