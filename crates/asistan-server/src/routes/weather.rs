//! Weather proxy endpoints under /api/weather.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::detail;
use crate::state::AppState;
use asistan_core::Error;
use asistan_store::now_iso;
use asistan_weather::WeatherReport;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/weather", get(weather_by_city))
        .route("/weather/current", post(current_weather))
        .route("/weather/cities/{city_name}", get(search_cities))
}

#[derive(Debug, Deserialize)]
struct CityQuery {
    city: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WeatherRequest {
    city: String,
    #[serde(default)]
    country_code: Option<String>,
}

/// The upstream messages surface as the response detail; anything else
/// collapses to the endpoint's own failure text.
fn weather_error(err: Error, fallback: &str) -> (StatusCode, Json<serde_json::Value>) {
    match err {
        Error::NotFound(message) => detail(StatusCode::NOT_FOUND, &message),
        Error::Config(message) | Error::Http(message) => {
            detail(StatusCode::INTERNAL_SERVER_ERROR, &message)
        }
        other => {
            tracing::error!("{}: {}", fallback, other);
            detail(StatusCode::INTERNAL_SERVER_ERROR, fallback)
        }
    }
}

/// Flat payload served to clients and reused by the chat weather context.
pub(crate) fn report_payload(report: &WeatherReport) -> serde_json::Value {
    json!({
        "city": report.city,
        "country": report.country,
        "temperature": report.temperature,
        "condition": report.condition,
        "humidity": report.humidity,
        "wind_speed": report.wind_speed,
        "pressure": report.pressure,
        "feels_like": report.feels_like,
        "timestamp": now_iso(),
    })
}

async fn weather_by_city(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CityQuery>,
) -> (StatusCode, Json<serde_json::Value>) {
    let city = query
        .city
        .unwrap_or_else(|| state.config.default_city.clone());

    match state.weather.current(&city, None).await {
        Ok(report) => (StatusCode::OK, Json(report_payload(&report))),
        Err(err) => weather_error(err, "Hava durumu bilgisi alınırken hata oluştu"),
    }
}

async fn current_weather(
    State(state): State<Arc<AppState>>,
    Json(req): Json<WeatherRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state
        .weather
        .current(&req.city, req.country_code.as_deref())
        .await
    {
        Ok(report) => (
            StatusCode::OK,
            Json(json!({
                "city": report.city,
                "country": report.country,
                "temperature": report.temperature,
                "description": report.condition,
                "humidity": report.humidity,
                "wind_speed": report.wind_speed,
                "pressure": report.pressure,
                "timestamp": now_iso(),
            })),
        ),
        Err(err) => weather_error(err, "Hava durumu bilgisi alınırken hata oluştu"),
    }
}

async fn search_cities(
    State(state): State<Arc<AppState>>,
    Path(city_name): Path<String>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.weather.search_cities(&city_name).await {
        Ok(cities) => (
            StatusCode::OK,
            Json(json!({ "query": city_name, "cities": cities })),
        ),
        Err(err) => weather_error(err, "Şehir arama yapılırken hata oluştu"),
    }
}
