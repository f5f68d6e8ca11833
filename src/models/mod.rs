//! Data models for `TripCast`
//!
//! - Location: place queries and resolved coordinates
//! - Route: polyline between two coordinates
//! - Weather: current temperature snapshots
//! - Plan: the combined result of one search

pub mod location;
pub mod plan;
pub mod route;
pub mod weather;

pub use location::{Coordinate, PlaceQuery};
pub use plan::TripPlan;
pub use route::RouteResult;
pub use weather::WeatherReading;
