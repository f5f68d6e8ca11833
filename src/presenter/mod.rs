//! Map presentation
//!
//! The map surface is written by several background tasks per search. To keep
//! a stale search from drawing over a newer one, every write travels through
//! a single-writer queue (`PresenterQueue`) that owns the presenter and drops
//! anything not tagged with the current generation.

use std::fmt::{self, Display};

use crate::models::{Coordinate, RouteResult};

pub mod queue;
pub mod surface;

pub use queue::{PresenterHandle, PresenterQueue};
pub use surface::{ConsolePresenter, MapSnapshot, MapSurface, Overlay};

/// Id of one `plan()` call. Strictly increasing, starts at 1.
pub type Generation = u64;

/// Drawing operations on the map view
pub trait MapPresenter: Send {
    fn clear_overlays(&mut self);
    fn add_route_overlay(&mut self, route: &RouteResult);
    fn add_marker(&mut self, at: Coordinate, label: &str);
    fn center_on(&mut self, at: Coordinate, zoom: f64);
    fn show_status(&mut self, status: &PlanStatus);
}

/// Status line shown to the user, one variant per failure kind
#[derive(Debug, Clone, PartialEq)]
pub enum PlanStatus {
    Searching,
    GeocodeFailed(String),
    RouteUnavailable(String),
    WeatherUnavailable(String),
    Ready,
}

impl Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanStatus::Searching => write!(f, "Searching..."),
            PlanStatus::GeocodeFailed(message) => write!(f, "Search failed: {message}"),
            PlanStatus::RouteUnavailable(message) => write!(f, "Route unavailable: {message}"),
            PlanStatus::WeatherUnavailable(message) => {
                write!(f, "Weather unavailable: {message}")
            }
            PlanStatus::Ready => write!(f, "Ready"),
        }
    }
}

/// A single change to the map
#[derive(Debug, Clone, PartialEq)]
pub enum MapUpdate {
    Route(RouteResult),
    Marker { at: Coordinate, label: String },
    Center { at: Coordinate, zoom: f64 },
}

/// Updates produced by one unit of work, applied together or not at all
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayBatch {
    pub generation: Generation,
    pub updates: Vec<MapUpdate>,
}

impl OverlayBatch {
    #[must_use]
    pub fn new(generation: Generation) -> Self {
        Self {
            generation,
            updates: Vec::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, update: MapUpdate) -> Self {
        self.updates.push(update);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub(crate) fn apply_to(&self, presenter: &mut dyn MapPresenter) {
        for update in &self.updates {
            match update {
                MapUpdate::Route(route) => presenter.add_route_overlay(route),
                MapUpdate::Marker { at, label } => presenter.add_marker(*at, label),
                MapUpdate::Center { at, zoom } => presenter.center_on(*at, *zoom),
            }
        }
    }
}
