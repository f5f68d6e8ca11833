//! Stub collaborators for orchestrator tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tripcast::{
    Coordinate, GeocodeClient, GeocodeError, MapSurface, PlaceQuery, PresenterQueue,
    RouteClient, RouteError, RouteResult, RouteWeatherOrchestrator, WeatherClient, WeatherError,
    WeatherReading,
};

pub const PARIS: Coordinate = Coordinate::new(48.8566, 2.3522);
pub const LYON: Coordinate = Coordinate::new(45.764, 4.8357);
pub const MARSEILLE: Coordinate = Coordinate::new(43.2965, 5.3698);
pub const NICE: Coordinate = Coordinate::new(43.7102, 7.262);

#[derive(Default)]
pub struct StubGeocoder {
    places: HashMap<String, Coordinate>,
    ambiguous: HashSet<String>,
    slow: Option<(String, Duration)>,
    pub calls: AtomicUsize,
}

impl StubGeocoder {
    pub fn with_cities() -> Self {
        let mut geocoder = Self::default();
        for (name, coordinate) in [
            ("Paris", PARIS),
            ("Lyon", LYON),
            ("Marseille", MARSEILLE),
            ("Nice", NICE),
        ] {
            geocoder.places.insert(name.to_string(), coordinate);
        }
        geocoder
    }

    pub fn with_ambiguous(mut self, name: &str) -> Self {
        self.ambiguous.insert(name.to_string());
        self
    }

    /// Delay lookups of `name`
    pub fn slow_for(mut self, name: &str, delay: Duration) -> Self {
        self.slow = Some((name.to_string(), delay));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeocodeClient for StubGeocoder {
    async fn resolve(&self, query: &PlaceQuery) -> Result<Coordinate, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some((name, delay)) = &self.slow {
            if name == query.as_str() {
                tokio::time::sleep(*delay).await;
            }
        }
        if query.is_blank() {
            return Err(GeocodeError::EmptyQuery);
        }
        if self.ambiguous.contains(query.as_str()) {
            return Err(GeocodeError::AmbiguousMatch {
                query: query.to_string(),
                candidates: 3,
            });
        }
        self.places
            .get(query.as_str())
            .copied()
            .ok_or_else(|| GeocodeError::NotFound {
                query: query.to_string(),
            })
    }
}

/// Returns a straight polyline with `points` points between the endpoints
pub struct StubRouter {
    points: usize,
    no_route: bool,
    slow_from: Option<(Coordinate, Duration)>,
    pub calls: AtomicUsize,
}

impl StubRouter {
    pub fn with_points(points: usize) -> Self {
        Self {
            points,
            no_route: false,
            slow_from: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn no_route() -> Self {
        Self {
            no_route: true,
            ..Self::with_points(0)
        }
    }

    /// Delay routes that start at `start`
    pub fn slow_from(mut self, start: Coordinate, delay: Duration) -> Self {
        self.slow_from = Some((start, delay));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub fn straight_line(start: Coordinate, end: Coordinate, points: usize) -> Vec<Coordinate> {
    let steps = points.saturating_sub(1).max(1) as f64;
    (0..points)
        .map(|i| {
            let t = i as f64 / steps;
            Coordinate::new(
                start.latitude + (end.latitude - start.latitude) * t,
                start.longitude + (end.longitude - start.longitude) * t,
            )
        })
        .collect()
}

#[async_trait]
impl RouteClient for StubRouter {
    async fn route(&self, points: &[Coordinate]) -> Result<RouteResult, RouteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (start, end) = (points[0], points[points.len() - 1]);

        if let Some((slow_start, delay)) = self.slow_from {
            if slow_start == start {
                tokio::time::sleep(delay).await;
            }
        }
        if self.no_route {
            return Err(RouteError::NoRoute);
        }
        Ok(RouteResult::new(straight_line(start, end, self.points)))
    }
}

/// Fixed temperatures per place name, recording the order of requests
#[derive(Default)]
pub struct StubWeather {
    temperatures: HashMap<String, f32>,
    pub requests: Mutex<Vec<String>>,
}

impl StubWeather {
    pub fn with_cities() -> Self {
        let mut weather = Self::default();
        for (name, temperature) in [("Paris", 14.5), ("Lyon", 17.0), ("Marseille", 22.1), ("Nice", 21.4)] {
            weather.temperatures.insert(name.to_string(), temperature);
        }
        weather
    }

    pub fn without(mut self, name: &str) -> Self {
        self.temperatures.remove(name);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherClient for StubWeather {
    async fn current_weather(
        &self,
        query: &PlaceQuery,
        _at: Coordinate,
    ) -> Result<WeatherReading, WeatherError> {
        self.requests.lock().unwrap().push(query.to_string());
        self.temperatures
            .get(query.as_str())
            .map(|temperature| WeatherReading::new(*temperature, query.clone()))
            .ok_or_else(|| WeatherError::unavailable("station offline"))
    }
}

pub struct Harness {
    pub orchestrator: Arc<RouteWeatherOrchestrator>,
    pub surface: MapSurface,
    pub geocoder: Arc<StubGeocoder>,
    pub router: Arc<StubRouter>,
    pub weather: Arc<StubWeather>,
}

impl Harness {
    pub fn new(geocoder: StubGeocoder, router: StubRouter, weather: StubWeather) -> Self {
        let surface = MapSurface::new();
        let presenter = PresenterQueue::spawn(surface.clone());
        let geocoder = Arc::new(geocoder);
        let router = Arc::new(router);
        let weather = Arc::new(weather);

        let orchestrator = Arc::new(RouteWeatherOrchestrator::new(
            geocoder.clone(),
            router.clone(),
            weather.clone(),
            presenter,
        ));

        Self {
            orchestrator,
            surface,
            geocoder,
            router,
            weather,
        }
    }

    pub fn standard() -> Self {
        Self::new(
            StubGeocoder::with_cities(),
            StubRouter::with_points(5),
            StubWeather::with_cities(),
        )
    }

    pub async fn settle(&self) {
        self.orchestrator.presenter().flush().await;
    }
}
