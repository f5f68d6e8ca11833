//! Route and weather planning for one start/end search
//!
//! `plan()` geocodes both names, then runs the route lookup and the weather
//! lookups as two independent tasks. Each task pushes its overlays to the
//! presenter queue as soon as it finishes, tagged with the search's
//! generation; `plan()` joins both and returns the assembled `TripPlan`.
//!
//! Starting a new search aborts the tasks of the previous one, and the
//! presenter queue drops any late batch from an older generation.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Result as AnyResult;
use tokio::task::{AbortHandle, JoinError};
use tracing::{debug, info, instrument, warn};

use crate::config::TripCastConfig;
use crate::error::{GeocodeError, RouteError, TripCastError, WeatherError};
use crate::geocoding::{GeocodeClient, OpenMeteoGeocoder};
use crate::http::build_client;
use crate::models::{Coordinate, PlaceQuery, RouteResult, TripPlan, WeatherReading};
use crate::presenter::{Generation, MapUpdate, OverlayBatch, PlanStatus, PresenterHandle};
use crate::routing::{self, RouteClient};
use crate::weather::{OpenMeteoWeatherClient, WeatherClient};

const DEFAULT_ROUTE_ZOOM: f64 = 7.5;

#[derive(Default)]
struct InFlight {
    generation: Generation,
    tasks: Vec<AbortHandle>,
}

/// Readings gathered by the weather task
#[derive(Debug, Default)]
struct WeatherOutcome {
    start: Option<WeatherReading>,
    end: Option<WeatherReading>,
    error: Option<WeatherError>,
}

pub struct RouteWeatherOrchestrator {
    geocoder: Arc<dyn GeocodeClient>,
    router: Arc<dyn RouteClient>,
    weather: Arc<dyn WeatherClient>,
    presenter: PresenterHandle,
    route_zoom: f64,
    in_flight: Mutex<InFlight>,
}

impl RouteWeatherOrchestrator {
    pub fn new(
        geocoder: Arc<dyn GeocodeClient>,
        router: Arc<dyn RouteClient>,
        weather: Arc<dyn WeatherClient>,
        presenter: PresenterHandle,
    ) -> Self {
        Self {
            geocoder,
            router,
            weather,
            presenter,
            route_zoom: DEFAULT_ROUTE_ZOOM,
            in_flight: Mutex::new(InFlight::default()),
        }
    }

    /// Wire up the HTTP-backed clients described by `config`
    pub fn from_config(config: &TripCastConfig, presenter: PresenterHandle) -> AnyResult<Self> {
        let client = build_client(&config.http)?;

        let geocoder = Arc::new(OpenMeteoGeocoder::new(client.clone(), &config.geocoding));
        let router = routing::from_config(client.clone(), &config.routing);
        let weather = Arc::new(OpenMeteoWeatherClient::new(client, &config.weather));

        Ok(Self::new(geocoder, router, weather, presenter).with_route_zoom(config.map.route_zoom))
    }

    #[must_use]
    pub fn with_route_zoom(mut self, zoom: f64) -> Self {
        self.route_zoom = zoom;
        self
    }

    #[must_use]
    pub fn presenter(&self) -> &PresenterHandle {
        &self.presenter
    }

    /// Generation of the most recent search, 0 before the first one
    #[must_use]
    pub fn current_generation(&self) -> Generation {
        self.lock().generation
    }

    /// Plan a trip from `start` to `end` and draw it.
    ///
    /// Fails fast on geocoding errors: nothing else is requested. Route and
    /// weather failures are recorded on the returned plan instead. Returns
    /// `TripCastError::Superseded` if a newer search started meanwhile.
    #[instrument(skip(self), fields(generation = tracing::field::Empty))]
    pub async fn plan(&self, start: PlaceQuery, end: PlaceQuery) -> crate::Result<TripPlan> {
        let generation = self.supersede();
        tracing::Span::current().record("generation", generation);
        info!("Planning trip from '{}' to '{}'", start, end);
        self.presenter.begin(generation);

        let (start_at, end_at) = match self.resolve_endpoints(&start, &end).await {
            Ok(endpoints) => endpoints,
            Err(e) => {
                let err = TripCastError::from(e);
                warn!("Geocoding failed: {}", err);
                self.presenter
                    .status(generation, PlanStatus::GeocodeFailed(err.user_message()));
                return Err(err);
            }
        };

        if self.current_generation() != generation {
            return Err(TripCastError::Superseded { generation });
        }

        self.presenter.apply(OverlayBatch::new(generation).with(MapUpdate::Center {
            at: end_at,
            zoom: self.route_zoom,
        }));

        let route_task = tokio::spawn(fetch_route(
            self.router.clone(),
            self.presenter.clone(),
            generation,
            start_at,
            end_at,
        ));
        let weather_task = tokio::spawn(fetch_weather(
            self.weather.clone(),
            self.presenter.clone(),
            generation,
            (start.clone(), start_at),
            (end.clone(), end_at),
        ));
        self.track(
            generation,
            [route_task.abort_handle(), weather_task.abort_handle()],
        );

        let (route_outcome, weather_outcome) = tokio::join!(route_task, weather_task);
        let route_outcome = joined(route_outcome, generation)?;
        let weather_outcome = joined(weather_outcome, generation)?;

        if self.current_generation() != generation {
            return Err(TripCastError::Superseded { generation });
        }

        let (route, route_error) = match route_outcome {
            Ok(route) => (route, None),
            Err(e) => (RouteResult::default(), Some(e)),
        };

        let plan = TripPlan {
            start: start_at,
            end: end_at,
            route,
            start_weather: weather_outcome.start,
            end_weather: weather_outcome.end,
            route_error,
            weather_error: weather_outcome.error,
        };

        if plan.is_complete() {
            self.presenter.status(generation, PlanStatus::Ready);
        }
        info!(
            "Trip {} ready: {} route points, complete: {}",
            generation,
            plan.route.len(),
            plan.is_complete()
        );
        Ok(plan)
    }

    /// Start endpoint first, then end. The first failure stops the lookup.
    async fn resolve_endpoints(
        &self,
        start: &PlaceQuery,
        end: &PlaceQuery,
    ) -> Result<(Coordinate, Coordinate), GeocodeError> {
        let start_at = self.geocoder.resolve(start).await?;
        let end_at = self.geocoder.resolve(end).await?;
        debug!("Resolved endpoints: {} -> {}", start_at, end_at);
        Ok((start_at, end_at))
    }

    /// Allocate the next generation and abort everything still running
    fn supersede(&self) -> Generation {
        let mut in_flight = self.lock();
        in_flight.generation += 1;
        for task in in_flight.tasks.drain(..) {
            task.abort();
        }
        in_flight.generation
    }

    fn track(&self, generation: Generation, tasks: [AbortHandle; 2]) {
        let mut in_flight = self.lock();
        if in_flight.generation == generation {
            in_flight.tasks.extend(tasks);
        } else {
            // superseded between spawn and here
            for task in tasks {
                task.abort();
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, InFlight> {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn joined<T>(outcome: Result<T, JoinError>, generation: Generation) -> crate::Result<T> {
    match outcome {
        Ok(value) => Ok(value),
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(_) => Err(TripCastError::Superseded { generation }),
    }
}

#[instrument(skip(router, presenter))]
async fn fetch_route(
    router: Arc<dyn RouteClient>,
    presenter: PresenterHandle,
    generation: Generation,
    start: Coordinate,
    end: Coordinate,
) -> Result<RouteResult, RouteError> {
    match router.route(&[start, end]).await {
        Ok(route) => {
            debug!("Route with {} points", route.len());
            presenter.apply(OverlayBatch::new(generation).with(MapUpdate::Route(route.clone())));
            Ok(route)
        }
        Err(e) => {
            warn!("Route lookup failed: {}", e);
            presenter.status(generation, PlanStatus::RouteUnavailable(e.to_string()));
            Err(e)
        }
    }
}

#[instrument(skip(weather, presenter))]
async fn fetch_weather(
    weather: Arc<dyn WeatherClient>,
    presenter: PresenterHandle,
    generation: Generation,
    start: (PlaceQuery, Coordinate),
    end: (PlaceQuery, Coordinate),
) -> WeatherOutcome {
    let mut outcome = WeatherOutcome::default();
    let mut batch = OverlayBatch::new(generation);

    for (is_start, (query, at)) in [(true, start), (false, end)] {
        match weather.current_weather(&query, at).await {
            Ok(reading) => {
                batch = batch.with(MapUpdate::Marker {
                    at,
                    label: reading.label(),
                });
                if is_start {
                    outcome.start = Some(reading);
                } else {
                    outcome.end = Some(reading);
                }
            }
            Err(e) => {
                warn!("Weather lookup for '{}' failed: {}", query, e);
                outcome.error.get_or_insert(e);
            }
        }
    }

    presenter.apply(batch);
    if let Some(e) = &outcome.error {
        presenter.status(generation, PlanStatus::WeatherUnavailable(e.to_string()));
    }
    outcome
}
