//! Place name resolution
//!
//! `GeocodeClient` is the seam the orchestrator talks to. The production
//! implementation queries the Open-Meteo geocoding API (no key required) and
//! applies the configured ambiguity policy to the candidate list.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::{AmbiguityPolicy, GeocodingConfig};
use crate::error::GeocodeError;
use crate::http::{FetchError, HttpClient, get_json};
use crate::models::{Coordinate, PlaceQuery};

/// Resolves a free-text place name to a coordinate
#[async_trait]
pub trait GeocodeClient: Send + Sync {
    async fn resolve(&self, query: &PlaceQuery) -> Result<Coordinate, GeocodeError>;
}

/// One ranked match returned by a geocoder
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeCandidate {
    pub name: String,
    pub coordinate: Coordinate,
    pub country: Option<String>,
    pub region: Option<String>,
}

impl GeocodeCandidate {
    /// "Lyon, Auvergne-Rhône-Alpes, France"
    #[must_use]
    pub fn display_name(&self) -> String {
        [Some(&self.name), self.region.as_ref(), self.country.as_ref()]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Pick the coordinate for `query` out of ranked `candidates`.
pub fn select_candidate(
    query: &PlaceQuery,
    candidates: Vec<GeocodeCandidate>,
    policy: AmbiguityPolicy,
) -> Result<Coordinate, GeocodeError> {
    match (candidates.len(), policy) {
        (0, _) => Err(GeocodeError::NotFound {
            query: query.to_string(),
        }),
        (1, _) | (_, AmbiguityPolicy::FirstMatch) => {
            let count = candidates.len();
            let Some(best) = candidates.into_iter().next() else {
                return Err(GeocodeError::NotFound {
                    query: query.to_string(),
                });
            };
            if count > 1 {
                warn!(
                    "'{}' matched {} places, using best match {}",
                    query,
                    count,
                    best.display_name()
                );
            }
            debug!(
                "Resolved '{}' to {} ({})",
                query,
                best.display_name(),
                best.coordinate
            );
            Ok(best.coordinate)
        }
        (count, AmbiguityPolicy::Reject) => Err(GeocodeError::AmbiguousMatch {
            query: query.to_string(),
            candidates: count,
        }),
    }
}

/// Open-Meteo geocoding client
pub struct OpenMeteoGeocoder {
    client: HttpClient,
    base_url: String,
    max_candidates: u32,
    policy: AmbiguityPolicy,
}

impl OpenMeteoGeocoder {
    pub fn new(client: HttpClient, config: &GeocodingConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_candidates: config.max_candidates,
            policy: config.ambiguity,
        }
    }

    /// Ranked candidates for a place name
    #[instrument(skip(self))]
    pub async fn search(&self, name: &str) -> Result<Vec<GeocodeCandidate>, GeocodeError> {
        let url = format!(
            "{}/search?name={}&count={}&language=en&format=json",
            self.base_url,
            urlencoding::encode(name),
            self.max_candidates
        );

        let response: openmeteo::GeocodingResponse =
            get_json(&self.client, &url).await.map_err(|e| match e {
                // Open-Meteo answers 400 for names it refuses to search
                FetchError::Status(status, _) if status == reqwest::StatusCode::BAD_REQUEST => {
                    GeocodeError::NotFound {
                        query: name.to_string(),
                    }
                }
                other => GeocodeError::unavailable(other.to_string()),
            })?;

        Ok(response
            .results
            .unwrap_or_default()
            .into_iter()
            .map(GeocodeCandidate::from)
            .collect())
    }
}

#[async_trait]
impl GeocodeClient for OpenMeteoGeocoder {
    async fn resolve(&self, query: &PlaceQuery) -> Result<Coordinate, GeocodeError> {
        if query.is_blank() {
            return Err(GeocodeError::EmptyQuery);
        }
        let candidates = self.search(query.as_str().trim()).await?;
        select_candidate(query, candidates, self.policy)
    }
}

/// `OpenMeteo` geocoding response structures
mod openmeteo {
    use super::{Coordinate, Deserialize, GeocodeCandidate};

    #[derive(Debug, Deserialize)]
    pub struct GeocodingResponse {
        pub results: Option<Vec<GeocodingResult>>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodingResult {
        pub name: String,
        pub latitude: f64,
        pub longitude: f64,
        pub country: Option<String>,
        pub admin1: Option<String>,
    }

    impl From<GeocodingResult> for GeocodeCandidate {
        fn from(result: GeocodingResult) -> Self {
            Self {
                name: result.name,
                coordinate: Coordinate::new(result.latitude, result.longitude),
                country: result.country,
                region: result.admin1,
            }
        }
    }
}
