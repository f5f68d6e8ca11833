//! HTTP provider tests against a mock server using wiremock.

use tripcast::config::{
    AmbiguityPolicy, GeocodingConfig, HttpConfig, RoutingConfig, RoutingProvider, WeatherConfig,
};
use tripcast::http::{HttpClient, build_client};
use tripcast::routing::{GraphHopperRouteClient, OsrmRouteClient};
use tripcast::{
    Coordinate, GeocodeClient, GeocodeError, OpenMeteoGeocoder, OpenMeteoWeatherClient,
    PlaceQuery, RouteClient, RouteError, WeatherClient, WeatherError,
};
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PARIS: Coordinate = Coordinate::new(48.8566, 2.3522);
const LYON: Coordinate = Coordinate::new(45.764, 4.8357);

fn client() -> HttpClient {
    let config = HttpConfig {
        max_retries: 0,
        ..HttpConfig::default()
    };
    build_client(&config).unwrap()
}

fn geocoder(server: &MockServer, ambiguity: AmbiguityPolicy) -> OpenMeteoGeocoder {
    let config = GeocodingConfig {
        base_url: server.uri(),
        ambiguity,
        ..GeocodingConfig::default()
    };
    OpenMeteoGeocoder::new(client(), &config)
}

fn geocoding_result(name: &str, latitude: f64, longitude: f64) -> serde_json::Value {
    serde_json::json!({
        "id": 2996944,
        "name": name,
        "latitude": latitude,
        "longitude": longitude,
        "country": "France",
        "admin1": "Auvergne-Rhône-Alpes"
    })
}

#[tokio::test]
async fn test_geocode_single_match() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("name", "Lyon"))
        .and(query_param("count", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [geocoding_result("Lyon", 45.764, 4.8357)]
        })))
        .mount(&mock_server)
        .await;

    let geocoder = geocoder(&mock_server, AmbiguityPolicy::Reject);
    let coordinate = geocoder.resolve(&PlaceQuery::from("Lyon")).await.unwrap();

    assert_eq!(coordinate, LYON);
}

#[tokio::test]
async fn test_geocode_no_results_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "generationtime_ms": 0.4
        })))
        .mount(&mock_server)
        .await;

    let geocoder = geocoder(&mock_server, AmbiguityPolicy::FirstMatch);
    let result = geocoder.resolve(&PlaceQuery::from("Atlantis")).await;

    assert_eq!(
        result,
        Err(GeocodeError::NotFound {
            query: "Atlantis".into()
        })
    );
}

#[tokio::test]
async fn test_geocode_ambiguity_policies() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                geocoding_result("Paris", 48.8566, 2.3522),
                geocoding_result("Paris", 33.6609, -95.5555)
            ]
        })))
        .mount(&mock_server)
        .await;

    let first = geocoder(&mock_server, AmbiguityPolicy::FirstMatch)
        .resolve(&PlaceQuery::from("Paris"))
        .await;
    assert_eq!(first, Ok(PARIS));

    let strict = geocoder(&mock_server, AmbiguityPolicy::Reject)
        .resolve(&PlaceQuery::from("Paris"))
        .await;
    assert_eq!(
        strict,
        Err(GeocodeError::AmbiguousMatch {
            query: "Paris".into(),
            candidates: 2
        })
    );
}

#[tokio::test]
async fn test_geocode_blank_query_skips_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = geocoder(&mock_server, AmbiguityPolicy::FirstMatch)
        .resolve(&PlaceQuery::from("  "))
        .await;

    assert_eq!(result, Err(GeocodeError::EmptyQuery));
}

#[tokio::test]
async fn test_geocode_server_error_is_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let result = geocoder(&mock_server, AmbiguityPolicy::FirstMatch)
        .resolve(&PlaceQuery::from("Lyon"))
        .await;

    assert!(matches!(result, Err(GeocodeError::Unavailable { .. })));
}

fn osrm(server: &MockServer) -> OsrmRouteClient {
    let config = RoutingConfig {
        base_url: server.uri(),
        ..RoutingConfig::default()
    };
    OsrmRouteClient::new(client(), &config)
}

#[tokio::test]
async fn test_osrm_route_geometry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/.+"))
        .and(query_param("geometries", "geojson"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": "Ok",
            "routes": [{
                "distance": 465210.3,
                "duration": 16262.1,
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[2.3522, 48.8566], [3.5, 47.2], [4.8357, 45.764]]
                }
            }],
            "waypoints": []
        })))
        .mount(&mock_server)
        .await;

    let route = osrm(&mock_server).route(&[PARIS, LYON]).await.unwrap();

    assert_eq!(route.len(), 3);
    assert_eq!(route.points[0], PARIS);
    assert_eq!(route.points[2], LYON);
    assert_eq!(route.distance_m, Some(465210.3));
    assert_eq!(route.duration_s, Some(16262.1));
}

#[tokio::test]
async fn test_osrm_no_route() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/.+"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "code": "NoRoute",
            "message": "Impossible route between points"
        })))
        .mount(&mock_server)
        .await;

    let result = osrm(&mock_server).route(&[PARIS, LYON]).await;

    assert_eq!(result, Err(RouteError::NoRoute));
}

#[tokio::test]
async fn test_osrm_server_error_is_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let result = osrm(&mock_server).route(&[PARIS, LYON]).await;

    assert!(matches!(result, Err(RouteError::Unavailable { .. })));
}

fn graphhopper(server: &MockServer) -> GraphHopperRouteClient {
    graphhopper_with_profile(server, "car")
}

fn graphhopper_with_profile(server: &MockServer, profile: &str) -> GraphHopperRouteClient {
    let config = RoutingConfig {
        provider: RoutingProvider::Graphhopper,
        base_url: server.uri(),
        profile: profile.to_string(),
        api_key: Some("test-key".to_string()),
    };
    GraphHopperRouteClient::new(client(), &config)
}

#[tokio::test]
async fn test_graphhopper_route() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/route"))
        .and(query_param("profile", "car"))
        .and(query_param("key", "test-key"))
        .and(query_param("points_encoded", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "paths": [{
                "distance": 466000.0,
                "time": 16200000,
                "points": {
                    "type": "LineString",
                    "coordinates": [[2.3522, 48.8566], [4.8357, 45.764]]
                }
            }]
        })))
        .mount(&mock_server)
        .await;

    let route = graphhopper(&mock_server).route(&[PARIS, LYON]).await.unwrap();

    assert_eq!(route.points, vec![PARIS, LYON]);
    assert_eq!(route.duration_s, Some(16200.0));
}

#[tokio::test]
async fn test_graphhopper_unknown_point_is_no_route() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/route"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "message": "Cannot find point 1: 45.764,4.8357"
        })))
        .mount(&mock_server)
        .await;

    let result = graphhopper(&mock_server).route(&[PARIS, LYON]).await;

    assert_eq!(result, Err(RouteError::NoRoute));
}

#[tokio::test]
async fn test_graphhopper_profile_is_url_encoded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/route"))
        .and(query_param("profile", "my car&truck"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "paths": [{
                "distance": 466000.0,
                "time": 16200000,
                "points": {
                    "type": "LineString",
                    "coordinates": [[2.3522, 48.8566], [4.8357, 45.764]]
                }
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let route = graphhopper_with_profile(&mock_server, "my car&truck")
        .route(&[PARIS, LYON])
        .await
        .unwrap();

    assert_eq!(route.points, vec![PARIS, LYON]);
}

fn weather(server: &MockServer) -> OpenMeteoWeatherClient {
    let config = WeatherConfig {
        base_url: server.uri(),
    };
    OpenMeteoWeatherClient::new(client(), &config)
}

#[tokio::test]
async fn test_current_weather_reading() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("latitude", "45.764"))
        .and(query_param("longitude", "4.8357"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latitude": 45.76,
            "longitude": 4.84,
            "current": {
                "time": "2026-10-19T12:00",
                "interval": 900,
                "temperature_2m": 17.3,
                "weathercode": 61
            }
        })))
        .mount(&mock_server)
        .await;

    let reading = weather(&mock_server)
        .current_weather(&PlaceQuery::from("Lyon"), LYON)
        .await
        .unwrap();

    assert_eq!(reading.temperature_celsius, 17.3);
    assert_eq!(reading.source_query.as_str(), "Lyon");
    assert_eq!(reading.description.as_deref(), Some("Slight rain"));
    assert_eq!(reading.label(), "Lyon 17.3°C");
}

#[tokio::test]
async fn test_current_weather_missing_block_is_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latitude": 45.76,
            "longitude": 4.84
        })))
        .mount(&mock_server)
        .await;

    let result = weather(&mock_server)
        .current_weather(&PlaceQuery::from("Lyon"), LYON)
        .await;

    assert!(matches!(result, Err(WeatherError::Unavailable { .. })));
}

#[tokio::test]
async fn test_current_weather_bad_request_is_unrecognized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": true,
            "reason": "Latitude must be in range of -90 to 90°."
        })))
        .mount(&mock_server)
        .await;

    let result = weather(&mock_server)
        .current_weather(&PlaceQuery::from("Nowhere"), Coordinate::new(120.0, 0.0))
        .await;

    assert_eq!(
        result,
        Err(WeatherError::Unrecognized {
            query: "Nowhere".into()
        })
    );
}
