//! The assembled result of one search

use serde::{Deserialize, Serialize};

use super::{Coordinate, RouteResult, WeatherReading};
use crate::error::{RouteError, WeatherError};

/// Route and endpoint weather for one start/end search.
///
/// Only built once both endpoints resolved. Route and weather failures are
/// recorded next to the (empty) data they would have produced.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TripPlan {
    pub start: Coordinate,
    pub end: Coordinate,
    pub route: RouteResult,
    pub start_weather: Option<WeatherReading>,
    pub end_weather: Option<WeatherReading>,
    #[serde(skip)]
    pub route_error: Option<RouteError>,
    #[serde(skip)]
    pub weather_error: Option<WeatherError>,
}

impl TripPlan {
    /// True when the route and both weather readings arrived
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.route_error.is_none()
            && self.weather_error.is_none()
            && self.start_weather.is_some()
            && self.end_weather.is_some()
    }
}
