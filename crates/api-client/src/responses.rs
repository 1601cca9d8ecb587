//! Serde models for the OpenWeatherMap current-weather JSON envelope.
//! Only the fields the pipeline flattens are modeled; the rest of the
//! payload is ignored during deserialization.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeatherResponse {
    /// City name as resolved by the API.
    pub name: String,
    /// Epoch seconds of the observation ("data calculation time").
    pub dt: i64,
    pub main: MainReadings,
    pub wind: WindReadings,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MainReadings {
    /// Temperature in °C (metric units requested).
    pub temp: f64,
    pub feels_like: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindReadings {
    /// Wind speed in m/s.
    pub speed: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherCondition {
    pub main: String,
    pub description: String,
}
