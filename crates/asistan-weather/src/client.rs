//! OpenWeatherMap proxy client.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use asistan_core::{Error, Result};

const WEATHER_URL: &str = "http://api.openweathermap.org/data/2.5/weather";
const GEO_URL: &str = "http://api.openweathermap.org/geo/1.0/direct";

/// Flat weather record with metric units and Turkish condition text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    pub country: String,
    pub temperature: f64,
    pub condition: String,
    pub humidity: i64,
    pub wind_speed: f64,
    pub pressure: i64,
    pub feels_like: f64,
}

/// One geocoding hit for city autocomplete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityMatch {
    pub name: String,
    pub country: String,
    pub state: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Clone)]
pub struct WeatherClient {
    http: Client,
    api_key: Option<String>,
}

impl WeatherClient {
    pub fn new(http: Client, api_key: Option<String>) -> Self {
        Self { http, api_key }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| Error::Config("OpenWeather API anahtarı yapılandırılmamış".into()))
    }

    /// Current conditions for a city, optionally narrowed by a two-letter
    /// country code.
    pub async fn current(&self, city: &str, country_code: Option<&str>) -> Result<WeatherReport> {
        let key = self.key()?;
        let query = match country_code {
            Some(code) => format!("{},{}", city, code),
            None => city.to_string(),
        };

        let response = self
            .http
            .get(WEATHER_URL)
            .query(&[
                ("q", query.as_str()),
                ("appid", key),
                ("units", "metric"),
                ("lang", "tr"),
            ])
            .send()
            .await
            .map_err(|e| {
                // without_url: the URL carries the API key
                error!("Weather request failed: {}", e.without_url());
                Error::Http("Hava durumu bilgisi alınırken hata oluştu".into())
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::NotFound("Şehir bulunamadı".into()));
        }
        if !response.status().is_success() {
            return Err(Error::Http("Hava durumu bilgisi alınamadı".into()));
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| {
                error!("Weather response decode failed: {}", e.without_url());
                Error::Http("Hava durumu bilgisi alınırken hata oluştu".into())
            })?;

        info!("Weather data retrieved for: {}", city);
        Ok(report_from(&data))
    }

    /// Up to five geocoding matches for autocomplete.
    pub async fn search_cities(&self, name: &str) -> Result<Vec<CityMatch>> {
        let key = self.key()?;

        let response = self
            .http
            .get(GEO_URL)
            .query(&[("q", name), ("limit", "5"), ("appid", key)])
            .send()
            .await
            .map_err(|e| {
                error!("City search request failed: {}", e.without_url());
                Error::Http("Şehir arama yapılırken hata oluştu".into())
            })?;

        if !response.status().is_success() {
            return Err(Error::Http("Şehir arama yapılamadı".into()));
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| {
                error!("City search decode failed: {}", e.without_url());
                Error::Http("Şehir arama yapılırken hata oluştu".into())
            })?;

        let cities = data
            .as_array()
            .map(|hits| {
                hits.iter()
                    .map(|hit| CityMatch {
                        name: hit["name"].as_str().unwrap_or_default().to_string(),
                        country: hit["country"].as_str().unwrap_or_default().to_string(),
                        state: hit["state"].as_str().unwrap_or_default().to_string(),
                        lat: hit["lat"].as_f64().unwrap_or_default(),
                        lon: hit["lon"].as_f64().unwrap_or_default(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(cities)
    }
}

fn report_from(data: &serde_json::Value) -> WeatherReport {
    WeatherReport {
        city: data["name"].as_str().unwrap_or_default().to_string(),
        country: data["sys"]["country"].as_str().unwrap_or_default().to_string(),
        temperature: round1(data["main"]["temp"].as_f64().unwrap_or_default()),
        condition: title_case(data["weather"][0]["description"].as_str().unwrap_or_default()),
        humidity: data["main"]["humidity"].as_i64().unwrap_or_default(),
        wind_speed: round1(data["wind"]["speed"].as_f64().unwrap_or_default()),
        pressure: data["main"]["pressure"].as_i64().unwrap_or_default(),
        feels_like: round1(data["main"]["feels_like"].as_f64().unwrap_or_default()),
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Uppercase each word's first letter, lowercase the rest. Plain Unicode
/// casing, matching how the upstream description text is displayed.
fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
