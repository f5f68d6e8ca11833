//! Current weather snapshot and display methods

use serde::{Deserialize, Serialize};

use super::PlaceQuery;

/// Current temperature reading for one place. Not cached, not versioned.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherReading {
    /// Temperature in Celsius
    pub temperature_celsius: f32,
    /// The place name this reading was requested for
    pub source_query: PlaceQuery,
    /// Human-readable description of weather conditions
    pub description: Option<String>,
}

impl WeatherReading {
    #[must_use]
    pub fn new(temperature_celsius: f32, source_query: PlaceQuery) -> Self {
        Self {
            temperature_celsius,
            source_query,
            description: None,
        }
    }

    #[must_use]
    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:.1}°C", self.temperature_celsius)
    }

    /// Marker title shown on the map
    #[must_use]
    pub fn label(&self) -> String {
        if self.source_query.is_blank() {
            self.format_temperature()
        } else {
            format!("{} {}", self.source_query, self.format_temperature())
        }
    }
}
