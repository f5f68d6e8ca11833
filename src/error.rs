//! Error types and handling for `TripCast`
//!
//! Each external collaborator has its own error enum so that a failed route
//! lookup can never be mistaken for a failed weather lookup. `TripCastError`
//! wraps all of them for callers that just want one type.

use thiserror::Error;

/// Failures while resolving a place name to a coordinate
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeocodeError {
    #[error("Place name is empty")]
    EmptyQuery,

    #[error("Location not found: {query}")]
    NotFound { query: String },

    #[error("Location '{query}' is ambiguous ({candidates} matches)")]
    AmbiguousMatch { query: String, candidates: usize },

    #[error("Geocoding service unavailable: {message}")]
    Unavailable { message: String },
}

/// Failures while fetching a route between resolved coordinates
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    #[error("No route found")]
    NoRoute,

    #[error("Routing service unavailable: {message}")]
    Unavailable { message: String },
}

/// Failures while fetching current weather
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeatherError {
    #[error("Weather service unavailable: {message}")]
    Unavailable { message: String },

    #[error("Weather not available for location: {query}")]
    Unrecognized { query: String },
}

/// Main error type for the `TripCast` application
#[derive(Error, Debug)]
pub enum TripCastError {
    #[error("Geocoding error: {0}")]
    Geocode(#[from] GeocodeError),

    #[error("Routing error: {0}")]
    Route(#[from] RouteError),

    #[error("Weather error: {0}")]
    Weather(#[from] WeatherError),

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A newer search replaced this one before it finished
    #[error("Search {generation} was superseded by a newer search")]
    Superseded { generation: u64 },
}

impl GeocodeError {
    pub fn unavailable<S: Into<String>>(message: S) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

impl RouteError {
    pub fn unavailable<S: Into<String>>(message: S) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

impl WeatherError {
    pub fn unavailable<S: Into<String>>(message: S) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

impl TripCastError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TripCastError::Geocode(GeocodeError::EmptyQuery) => {
                "Please enter both a start and a destination.".to_string()
            }
            TripCastError::Geocode(GeocodeError::NotFound { query }) => {
                format!("Could not find '{query}'. Check the spelling and try again.")
            }
            TripCastError::Geocode(GeocodeError::AmbiguousMatch { query, candidates }) => {
                format!("'{query}' matches {candidates} places. Please be more specific.")
            }
            TripCastError::Geocode(GeocodeError::Unavailable { .. }) => {
                "Unable to reach the place search service. Please check your internet connection."
                    .to_string()
            }
            TripCastError::Route(_) => "No driving route could be drawn.".to_string(),
            TripCastError::Weather(_) => "Current weather is not available.".to_string(),
            TripCastError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            TripCastError::Superseded { .. } => "Search replaced by a newer one.".to_string(),
        }
    }
}
