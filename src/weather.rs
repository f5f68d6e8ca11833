//! Current weather lookups
//!
//! `WeatherClient` is the seam used by the orchestrator. The production
//! implementation reads the `current` block of the Open-Meteo forecast API,
//! which needs no API key.

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::config::WeatherConfig;
use crate::error::WeatherError;
use crate::http::{FetchError, HttpClient, get_json};
use crate::models::{Coordinate, PlaceQuery, WeatherReading};

/// Resolves a place (name plus resolved coordinate) to its current temperature
#[async_trait]
pub trait WeatherClient: Send + Sync {
    async fn current_weather(
        &self,
        query: &PlaceQuery,
        at: Coordinate,
    ) -> Result<WeatherReading, WeatherError>;
}

/// Open-Meteo current weather client
pub struct OpenMeteoWeatherClient {
    client: HttpClient,
    base_url: String,
}

impl OpenMeteoWeatherClient {
    pub fn new(client: HttpClient, config: &WeatherConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl WeatherClient for OpenMeteoWeatherClient {
    #[instrument(skip(self), fields(place = %query))]
    async fn current_weather(
        &self,
        query: &PlaceQuery,
        at: Coordinate,
    ) -> Result<WeatherReading, WeatherError> {
        let url = format!(
            "{}/forecast?latitude={}&longitude={}&current=temperature_2m,weathercode",
            self.base_url, at.latitude, at.longitude
        );

        let response: openmeteo::ForecastResponse =
            get_json(&self.client, &url).await.map_err(|e| {
                warn!("Weather request for '{}' failed: {}", query, e);
                match e {
                    FetchError::Status(status, _) if status == reqwest::StatusCode::BAD_REQUEST => {
                        WeatherError::Unrecognized {
                            query: query.to_string(),
                        }
                    }
                    other => WeatherError::unavailable(other.to_string()),
                }
            })?;

        let Some(current) = response.current else {
            return Err(WeatherError::unavailable(
                "No current weather data available from OpenMeteo",
            ));
        };

        let mut reading = WeatherReading::new(current.temperature, query.clone());
        if let Some(code) = current.weather_code {
            reading = reading.with_description(openmeteo::weather_code_to_description(code));
        }

        info!("Current weather for '{}': {}", query, reading.format_temperature());
        Ok(reading)
    }
}

/// `OpenMeteo` API response structures and conversion utilities
pub(crate) mod openmeteo {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub current: Option<CurrentData>,
    }

    #[derive(Debug, Deserialize)]
    pub struct CurrentData {
        #[serde(rename = "temperature_2m")]
        pub temperature: f32,
        #[serde(rename = "weathercode")]
        pub weather_code: Option<u8>,
    }

    /// Convert `OpenMeteo` weather code to human-readable description
    #[must_use]
    pub fn weather_code_to_description(code: u8) -> &'static str {
        match code {
            0 => "Clear sky",
            1 => "Mainly clear",
            2 => "Partly cloudy",
            3 => "Overcast",
            45 => "Fog",
            48 => "Depositing rime fog",
            51 => "Light drizzle",
            53 => "Moderate drizzle",
            55 => "Dense drizzle",
            56 => "Light freezing drizzle",
            57 => "Dense freezing drizzle",
            61 => "Slight rain",
            63 => "Moderate rain",
            65 => "Heavy rain",
            66 => "Light freezing rain",
            67 => "Heavy freezing rain",
            71 => "Slight snow fall",
            73 => "Moderate snow fall",
            75 => "Heavy snow fall",
            77 => "Snow grains",
            80 => "Slight rain showers",
            81 => "Moderate rain showers",
            82 => "Violent rain showers",
            85 => "Slight snow showers",
            86 => "Heavy snow showers",
            95 => "Thunderstorm",
            96 => "Thunderstorm with slight hail",
            99 => "Thunderstorm with heavy hail",
            _ => "Unknown",
        }
    }
}
