//! `TripCast` - driving routes with current weather at both ends
//!
//! This library resolves a start and an end place name, fetches the driving
//! route between them and the current temperature at each endpoint, and
//! draws the result onto a map presenter.

pub mod config;
pub mod error;
pub mod geocoding;
pub mod http;
pub mod models;
pub mod orchestrator;
pub mod presenter;
pub mod routing;
pub mod weather;

// Re-export core types for public API
pub use config::TripCastConfig;
pub use error::{GeocodeError, RouteError, TripCastError, WeatherError};
pub use geocoding::{GeocodeClient, OpenMeteoGeocoder};
pub use models::{Coordinate, PlaceQuery, RouteResult, TripPlan, WeatherReading};
pub use orchestrator::RouteWeatherOrchestrator;
pub use presenter::{MapPresenter, MapSurface, PlanStatus, PresenterHandle, PresenterQueue};
pub use routing::RouteClient;
pub use weather::{OpenMeteoWeatherClient, WeatherClient};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TripCastError>;
