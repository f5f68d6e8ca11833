//! Concrete map surfaces: an in-memory recorder and a terminal printer

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::info;

use super::{MapPresenter, PlanStatus};
use crate::models::{Coordinate, RouteResult};

/// A drawn overlay
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    Route(RouteResult),
    Marker { at: Coordinate, label: String },
}

/// Everything currently visible on a `MapSurface`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapSnapshot {
    pub overlays: Vec<Overlay>,
    pub center: Option<(Coordinate, f64)>,
    pub status: Option<PlanStatus>,
    /// How many times the overlays were cleared
    pub clear_count: usize,
}

impl MapSnapshot {
    #[must_use]
    pub fn routes(&self) -> Vec<&RouteResult> {
        self.overlays
            .iter()
            .filter_map(|overlay| match overlay {
                Overlay::Route(route) => Some(route),
                Overlay::Marker { .. } => None,
            })
            .collect()
    }

    #[must_use]
    pub fn markers(&self) -> Vec<(Coordinate, &str)> {
        self.overlays
            .iter()
            .filter_map(|overlay| match overlay {
                Overlay::Marker { at, label } => Some((*at, label.as_str())),
                Overlay::Route(_) => None,
            })
            .collect()
    }

    #[must_use]
    pub fn marker_labels(&self) -> Vec<&str> {
        self.markers().into_iter().map(|(_, label)| label).collect()
    }
}

/// In-memory map surface. Clones share state, so one clone can be handed to
/// the presenter queue while another is used to inspect the result.
#[derive(Debug, Clone, Default)]
pub struct MapSurface {
    state: Arc<Mutex<MapSnapshot>>,
}

impl MapSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn snapshot(&self) -> MapSnapshot {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, MapSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MapPresenter for MapSurface {
    fn clear_overlays(&mut self) {
        let mut state = self.lock();
        state.overlays.clear();
        state.clear_count += 1;
    }

    fn add_route_overlay(&mut self, route: &RouteResult) {
        self.lock().overlays.push(Overlay::Route(route.clone()));
    }

    fn add_marker(&mut self, at: Coordinate, label: &str) {
        self.lock().overlays.push(Overlay::Marker {
            at,
            label: label.to_string(),
        });
    }

    fn center_on(&mut self, at: Coordinate, zoom: f64) {
        self.lock().center = Some((at, zoom));
    }

    fn show_status(&mut self, status: &PlanStatus) {
        self.lock().status = Some(status.clone());
    }
}

/// Prints every map operation to the terminal
#[derive(Debug, Default)]
pub struct ConsolePresenter;

impl MapPresenter for ConsolePresenter {
    fn clear_overlays(&mut self) {
        info!("Clearing map overlays");
    }

    fn add_route_overlay(&mut self, route: &RouteResult) {
        println!("🛣️  Route: {}", route.format_summary());
        if let (Some(first), Some(last)) = (route.points.first(), route.points.last()) {
            println!("   from {first} to {last}");
        }
    }

    fn add_marker(&mut self, at: Coordinate, label: &str) {
        println!("🌡️  {label} at {at}");
    }

    fn center_on(&mut self, at: Coordinate, zoom: f64) {
        println!("🗺️  Centered on {at} (zoom {zoom})");
    }

    fn show_status(&mut self, status: &PlanStatus) {
        println!("{status}");
    }
}
