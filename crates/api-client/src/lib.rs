//! # Weather API Client
//!
//! Polls a current-weather HTTP API (OpenWeatherMap-shaped) and
//! flattens each response into typed `Record`s the pipeline can ingest:
//! one record per sampled reading (temperature, feels-like, humidity,
//! wind speed), with the city serving as both sensor id and location.
//!
//! Retry policy lives with the caller; a failed city fetch surfaces as
//! an `ApiError` and the CLI decides whether to skip or abort.

use async_trait::async_trait;
use chrono::DateTime;
use configuration::WeatherSettings;
use core_types::{Record, Status};

pub mod error;
pub mod responses;

// --- Public API ---
pub use error::ApiError;
pub use responses::{CurrentWeatherResponse, MainReadings, WeatherCondition, WindReadings};

/// The parameters extracted from one current-weather response.
const PARAMETERS: [(&str, fn(&CurrentWeatherResponse) -> f64); 4] = [
    ("Temperature", |r| r.main.temp),
    ("FeelsLike", |r| r.main.feels_like),
    ("Humidity", |r| r.main.humidity),
    ("WindSpeed", |r| r.wind.speed),
];

/// The generic, abstract interface for a current-weather source.
/// Lets the CLI swap the live client for a mock in tests.
#[async_trait]
pub trait WeatherApi: Send + Sync {
    /// Fetches the current readings for one city as flattened records.
    async fn fetch_current(&self, city: &str) -> Result<Vec<Record>, ApiError>;
}

/// A concrete client for the OpenWeatherMap current-weather endpoint.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(settings: &WeatherSettings, api_key: String) -> Self {
        WeatherClient {
            client: reqwest::Client::new(),
            base_url: settings.base_url.clone(),
            api_key,
        }
    }
}

#[async_trait]
impl WeatherApi for WeatherClient {
    async fn fetch_current(&self, city: &str) -> Result<Vec<Record>, ApiError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", city), ("appid", &self.api_key), ("units", "metric")])
            .send()
            .await?
            .error_for_status()?;

        let payload: CurrentWeatherResponse = response.json().await?;
        tracing::debug!(city, observed_at = payload.dt, "fetched current weather");
        flatten_current_weather(&payload)
    }
}

/// Flattens one JSON envelope into one record per sampled reading.
pub fn flatten_current_weather(
    payload: &CurrentWeatherResponse,
) -> Result<Vec<Record>, ApiError> {
    let date = DateTime::from_timestamp(payload.dt, 0)
        .ok_or_else(|| ApiError::MalformedResponse {
            city: payload.name.clone(),
            reason: format!("dt {} is not a valid epoch timestamp", payload.dt),
        })?
        .date_naive();

    Ok(PARAMETERS
        .iter()
        .map(|(parameter, extract)| Record {
            id: payload.name.clone(),
            date,
            location: payload.name.clone(),
            parameter: (*parameter).to_string(),
            value: extract(payload),
            status: Status::Good,
        })
        .collect())
}
