//! Route polyline between two resolved coordinates

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// Ordered path from start to end. Empty when no route was found.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct RouteResult {
    pub points: Vec<Coordinate>,
    /// Total length in meters, when the routing engine reports it
    pub distance_m: Option<f64>,
    /// Expected driving time in seconds, when the routing engine reports it
    pub duration_s: Option<f64>,
}

impl RouteResult {
    #[must_use]
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self {
            points,
            distance_m: None,
            duration_s: None,
        }
    }

    #[must_use]
    pub fn with_summary(mut self, distance_m: f64, duration_s: f64) -> Self {
        self.distance_m = Some(distance_m);
        self.duration_s = Some(duration_s);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Short human-readable summary, e.g. "465.2 km, 4h 31m"
    #[must_use]
    pub fn format_summary(&self) -> String {
        match (self.distance_m, self.duration_s) {
            (Some(distance), Some(duration)) => {
                let minutes = (duration / 60.0).round() as u64;
                format!(
                    "{:.1} km, {}h {:02}m",
                    distance / 1000.0,
                    minutes / 60,
                    minutes % 60
                )
            }
            _ => format!("{} points", self.points.len()),
        }
    }
}
