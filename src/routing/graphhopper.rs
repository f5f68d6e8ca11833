use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use super::{LineString, RouteClient};
use crate::config::RoutingConfig;
use crate::error::RouteError;
use crate::http::{FetchError, HttpClient, get_json};
use crate::models::{Coordinate, RouteResult};

pub struct GraphHopperRouteClient {
    client: HttpClient,
    base_url: String,
    profile: String,
    api_key: String,
}

impl GraphHopperRouteClient {
    pub fn new(client: HttpClient, config: &RoutingConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            profile: config.profile.clone(),
            api_key: config.api_key.clone().unwrap_or_default(),
        }
    }
}

#[async_trait]
impl RouteClient for GraphHopperRouteClient {
    #[instrument(skip(self), fields(waypoints = points.len()))]
    async fn route(&self, points: &[Coordinate]) -> Result<RouteResult, RouteError> {
        if points.len() < 2 {
            return Err(RouteError::NoRoute);
        }

        let waypoints: String = points
            .iter()
            .map(|point| format!("point={},{}&", point.latitude, point.longitude))
            .collect();
        let url = format!(
            "{}/route?{}profile={}&points_encoded=false&key={}",
            self.base_url,
            waypoints,
            urlencoding::encode(&self.profile),
            urlencoding::encode(&self.api_key)
        );

        let response: ApiResponse = get_json(&self.client, &url).await.map_err(|e| match e {
            // unknown points and disconnected graphs both come back as 400
            FetchError::Status(status, _) if status == reqwest::StatusCode::BAD_REQUEST => {
                RouteError::NoRoute
            }
            other => RouteError::unavailable(other.to_string()),
        })?;

        let path = response
            .paths
            .into_iter()
            .next()
            .ok_or(RouteError::NoRoute)?;

        Ok(RouteResult::new(path.points.into_points())
            .with_summary(path.distance, path.time as f64 / 1000.0))
    }
}

#[derive(Debug, Deserialize)]
struct PathResponse {
    distance: f64,
    /// milliseconds
    time: u64,
    points: LineString,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    paths: Vec<PathResponse>,
}
