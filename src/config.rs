//! Configuration management for `TripCast`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::TripCastError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for `TripCast`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TripCastConfig {
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// What to do when a place name matches more than one location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityPolicy {
    /// Take the geocoder's best-ranked match
    #[default]
    FirstMatch,
    /// Fail with `GeocodeError::AmbiguousMatch`
    Reject,
}

/// Routing engine backing the route overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoutingProvider {
    #[default]
    Osrm,
    Graphhopper,
}

/// Geocoding API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,
    /// Number of candidates requested per lookup
    #[serde(default = "default_max_candidates")]
    pub max_candidates: u32,
    #[serde(default)]
    pub ambiguity: AmbiguityPolicy,
}

/// Routing API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    #[serde(default)]
    pub provider: RoutingProvider,
    /// Left empty to use the selected provider's public endpoint
    #[serde(default)]
    pub base_url: String,
    /// Routing profile, e.g. "driving" for OSRM or "car" for GraphHopper
    #[serde(default)]
    pub profile: String,
    /// API key, required by GraphHopper only
    pub api_key: Option<String>,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
}

/// Shared HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub timeout_seconds: u32,
    /// Retries for transient failures (0 disables retrying)
    #[serde(default = "default_http_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Map presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Zoom level used when centring on the destination
    #[serde(default = "default_route_zoom")]
    pub route_zoom: f64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_geocoding_base_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_max_candidates() -> u32 {
    5
}

fn default_routing_base_url() -> String {
    "https://router.project-osrm.org".to_string()
}

fn default_graphhopper_base_url() -> String {
    "https://graphhopper.com/api/1".to_string()
}

fn default_routing_profile() -> String {
    "driving".to_string()
}

fn default_graphhopper_profile() -> String {
    "car".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_http_timeout() -> u32 {
    10
}

fn default_http_max_retries() -> u32 {
    2
}

fn default_user_agent() -> String {
    format!("TripCast/{}", crate::VERSION)
}

fn default_route_zoom() -> f64 {
    7.5
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            max_candidates: default_max_candidates(),
            ambiguity: AmbiguityPolicy::default(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            provider: RoutingProvider::default(),
            base_url: default_routing_base_url(),
            profile: default_routing_profile(),
            api_key: None,
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_http_timeout(),
            max_retries: default_http_max_retries(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            route_zoom: default_route_zoom(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl TripCastConfig {
    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // TRIPCAST_ROUTING__API_KEY -> routing.api_key
        builder = builder.add_source(
            Environment::with_prefix("TRIPCAST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TripCastConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tripcast").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.geocoding.base_url.is_empty() {
            self.geocoding.base_url = default_geocoding_base_url();
        }
        if self.geocoding.max_candidates == 0 {
            self.geocoding.max_candidates = default_max_candidates();
        }
        if self.routing.base_url.is_empty() {
            self.routing.base_url = match self.routing.provider {
                RoutingProvider::Osrm => default_routing_base_url(),
                RoutingProvider::Graphhopper => default_graphhopper_base_url(),
            };
        }
        if self.routing.profile.is_empty() {
            self.routing.profile = match self.routing.provider {
                RoutingProvider::Osrm => default_routing_profile(),
                RoutingProvider::Graphhopper => default_graphhopper_profile(),
            };
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.http.timeout_seconds == 0 {
            self.http.timeout_seconds = default_http_timeout();
        }
        if self.http.user_agent.is_empty() {
            self.http.user_agent = default_user_agent();
        }
        if self.map.route_zoom <= 0.0 {
            self.map.route_zoom = default_route_zoom();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        match (&self.routing.provider, &self.routing.api_key) {
            (RoutingProvider::Graphhopper, None) => Err(TripCastError::config(
                "GraphHopper routing requires routing.api_key (or TRIPCAST_ROUTING__API_KEY)",
            )
            .into()),
            (_, Some(key)) if key.trim().is_empty() => Err(TripCastError::config(
                "Routing API key cannot be empty if provided. Either remove it or provide a valid key.",
            )
            .into()),
            _ => Ok(()),
        }
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.http.timeout_seconds > 300 {
            return Err(TripCastError::config("HTTP timeout cannot exceed 300 seconds").into());
        }

        if self.http.max_retries > 10 {
            return Err(TripCastError::config("HTTP max retries cannot exceed 10").into());
        }

        if self.geocoding.max_candidates > 100 {
            return Err(
                TripCastError::config("Geocoding max candidates cannot exceed 100").into(),
            );
        }

        if !(1.0..=22.0).contains(&self.map.route_zoom) {
            return Err(TripCastError::config("Map zoom must be between 1 and 22").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TripCastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TripCastError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Geocoding", &self.geocoding.base_url),
            ("Routing", &self.routing.base_url),
            ("Weather", &self.weather.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(TripCastError::config(format!(
                    "{name} API base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
