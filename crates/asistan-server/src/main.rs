//! Turkish personal assistant backend: chat, notes, calendar, reminders
//! and weather behind one REST API.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod routes;
mod seed;
mod state;

use asistan_core::AsistanConfig;
use asistan_store::AssistantStore;
use state::AppState;

fn resolve_data_dir() -> PathBuf {
    std::env::var("ASISTAN_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    // Handle CLI subcommands
    if args.len() > 1 {
        match args[1].as_str() {
            "seed" => {
                let data_dir = if args.len() > 2 {
                    PathBuf::from(&args[2])
                } else {
                    resolve_data_dir()
                };
                let store = AssistantStore::open(&data_dir)
                    .map_err(|e| anyhow::anyhow!("Failed to open store: {}", e))?;
                let report = seed::load_sample_data(&store)?;
                println!(
                    "Örnek veriler eklendi: {} not, {} etkinlik",
                    report.notes, report.events
                );
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("Kişisel Asistan - Türkçe kişisel asistan API sunucusu");
                println!();
                println!("Usage: asistan [command]");
                println!();
                println!("Commands:");
                println!("  (none)             Start the server");
                println!("  seed [data-dir]    Load sample notes and events");
                println!("  help               Show this help message");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'asistan help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    // Normal server startup
    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());

    let config = AsistanConfig::from_env(&data_dir)?;

    let store = match AssistantStore::open(&config.data_dir) {
        Ok(store) => store,
        Err(e) => {
            warn!("Store unavailable, falling back to in-memory: {}", e);
            AssistantStore::in_memory()
                .map_err(|e| anyhow::anyhow!("Failed to open store: {}", e))?
        }
    };

    // One HTTP client shared by the Gemini and weather services
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()?;

    let gemini = asistan_gemini::GeminiClient::new(
        http.clone(),
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
    );
    if !gemini.is_configured() {
        warn!("GEMINI_API_KEY is not set; generative replies are disabled");
    }

    let weather = asistan_weather::WeatherClient::new(http, config.openweather_api_key.clone());
    if !weather.is_configured() {
        warn!("OPENWEATHER_API_KEY is not set; weather lookups are disabled");
    }

    let addr = format!("{}:{}", config.host, config.port);

    // Build application state and router
    let state = Arc::new(AppState::new(config, store, gemini, weather));
    let app = routes::build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Kişisel Asistan API listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
