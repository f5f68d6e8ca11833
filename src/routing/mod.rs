//! Driving routes between resolved coordinates
//!
//! Two engines are supported: OSRM (default, public demo server) and
//! GraphHopper (requires an API key).

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::{RoutingConfig, RoutingProvider};
use crate::error::RouteError;
use crate::http::HttpClient;
use crate::models::{Coordinate, RouteResult};

pub mod graphhopper;
pub mod osrm;

pub use graphhopper::GraphHopperRouteClient;
pub use osrm::OsrmRouteClient;

/// Resolves an ordered list of waypoints to a route polyline
#[async_trait]
pub trait RouteClient: Send + Sync {
    async fn route(&self, points: &[Coordinate]) -> Result<RouteResult, RouteError>;
}

/// Build the route client selected in the configuration
pub fn from_config(client: HttpClient, config: &RoutingConfig) -> Arc<dyn RouteClient> {
    match config.provider {
        RoutingProvider::Osrm => Arc::new(OsrmRouteClient::new(client, config)),
        RoutingProvider::Graphhopper => Arc::new(GraphHopperRouteClient::new(client, config)),
    }
}

/// GeoJSON `LineString` geometry, positions in [lon, lat] order
#[derive(Debug, Deserialize)]
pub(crate) struct LineString {
    pub coordinates: Vec<[f64; 2]>,
}

impl LineString {
    pub fn into_points(self) -> Vec<Coordinate> {
        self.coordinates
            .into_iter()
            .map(|[longitude, latitude]| Coordinate::new(latitude, longitude))
            .collect()
    }
}
