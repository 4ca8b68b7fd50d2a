//! Configuration from environment variables and defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level assistant configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsistanConfig {
    /// HTTP server port (`PORT`).
    pub port: u16,
    /// Bind address (`HOST`).
    pub host: String,
    /// Data directory; the SQLite database lives here.
    pub data_dir: PathBuf,
    /// Gemini API key (`GEMINI_API_KEY`). Absent key disables the generative path.
    pub gemini_api_key: Option<String>,
    /// Gemini model name (`GEMINI_MODEL`).
    pub gemini_model: String,
    /// OpenWeatherMap API key (`OPENWEATHER_API_KEY`).
    pub openweather_api_key: Option<String>,
    /// Fallback city for weather context (`ASISTAN_DEFAULT_CITY`).
    pub default_city: String,
    /// Outbound HTTP timeout in seconds (`ASISTAN_HTTP_TIMEOUT`).
    pub http_timeout_secs: u64,
}

impl AsistanConfig {
    /// Create configuration from environment and defaults. Creates the data
    /// directory if needed.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;

        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8000);

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        Ok(Self {
            port,
            host,
            data_dir,
            gemini_api_key: env_nonempty("GEMINI_API_KEY"),
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
            openweather_api_key: env_nonempty("OPENWEATHER_API_KEY"),
            default_city: std::env::var("ASISTAN_DEFAULT_CITY")
                .unwrap_or_else(|_| "Istanbul".to_string()),
            http_timeout_secs: std::env::var("ASISTAN_HTTP_TIMEOUT")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(15),
        })
    }
}

/// Read an environment variable, treating empty values as unset.
fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
