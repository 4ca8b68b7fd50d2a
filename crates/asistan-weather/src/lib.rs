//! OpenWeatherMap collaborator: current conditions and city autocomplete.

pub mod client;

pub use client::{CityMatch, WeatherClient, WeatherReport};
