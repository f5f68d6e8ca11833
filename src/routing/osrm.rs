//! OSRM route service adapter.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{LineString, RouteClient};
use crate::config::RoutingConfig;
use crate::error::RouteError;
use crate::http::{FetchError, HttpClient, get_json};
use crate::models::{Coordinate, RouteResult};

pub struct OsrmRouteClient {
    client: HttpClient,
    base_url: String,
    profile: String,
}

impl OsrmRouteClient {
    pub fn new(client: HttpClient, config: &RoutingConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            profile: config.profile.clone(),
        }
    }

    fn route_url(&self, points: &[Coordinate]) -> String {
        let coords = points
            .iter()
            .map(|point| format!("{:.6},{:.6}", point.longitude, point.latitude))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/route/v1/{}/{}?overview=full&geometries=geojson",
            self.base_url, self.profile, coords
        )
    }
}

#[async_trait]
impl RouteClient for OsrmRouteClient {
    #[instrument(skip(self), fields(waypoints = points.len()))]
    async fn route(&self, points: &[Coordinate]) -> Result<RouteResult, RouteError> {
        if points.len() < 2 {
            return Err(RouteError::NoRoute);
        }

        let response: OsrmRouteResponse = match get_json(&self.client, &self.route_url(points)).await
        {
            Ok(response) => response,
            // OSRM reports routing failures as 400 with a JSON code
            Err(FetchError::Status(status, body)) if status.is_client_error() => {
                serde_json::from_str::<OsrmRouteResponse>(&body).map_err(|_| {
                    RouteError::unavailable(format!("OSRM HTTP {status}: {body}"))
                })?
            }
            Err(other) => return Err(RouteError::unavailable(other.to_string())),
        };

        if response.code != "Ok" {
            debug!(
                "OSRM returned {}: {}",
                response.code,
                response.message.as_deref().unwrap_or_default()
            );
            return match response.code.as_str() {
                "NoRoute" | "NoSegment" => Err(RouteError::NoRoute),
                _ => Err(RouteError::unavailable(format!(
                    "OSRM error {}",
                    response.code
                ))),
            };
        }

        let route = response
            .routes
            .into_iter()
            .next()
            .ok_or(RouteError::NoRoute)?;

        Ok(RouteResult::new(route.geometry.into_points())
            .with_summary(route.distance, route.duration))
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: LineString,
    distance: f64,
    duration: f64,
}
