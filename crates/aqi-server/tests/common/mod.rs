//! In-process fakes for the upstream services, counting every call.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use aqi_core::{BoundingBox, Coordinate, EngineRoute, Place, PlaceFields, PollutionSources};
use aqi_server::cache::MemoryCache;
use aqi_server::config::Config;
use aqi_server::state::{AppState, Upstreams};
use aqi_upstream::{
    AqiLookup, Geocoder, PollutionSourceLookup, ReverseGeocoder, RoutingEngine, UpstreamError,
};

pub const DELHI: Coordinate = Coordinate { lat: 28.60, lon: 77.20 };
pub const AGRA: Coordinate = Coordinate { lat: 27.18, lon: 78.01 };
pub const JAIPUR: Coordinate = Coordinate { lat: 26.91, lon: 75.79 };
pub const GURUGRAM: Coordinate = Coordinate { lat: 28.46, lon: 77.03 };

fn key(at: Coordinate) -> String {
    at.key(4)
}

#[derive(Default)]
pub struct FakeGeocoder {
    pub calls: AtomicUsize,
    places: HashMap<String, Coordinate>,
}

impl FakeGeocoder {
    pub fn with_cities() -> Self {
        let places = [
            ("Delhi", DELHI),
            ("Agra", AGRA),
            ("Jaipur", JAIPUR),
            ("Gurugram", GURUGRAM),
        ]
        .into_iter()
        .map(|(name, at)| (name.to_string(), at))
        .collect();
        Self {
            calls: AtomicUsize::new(0),
            places,
        }
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn geocode(&self, city: &str) -> Result<Place, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.places
            .get(city)
            .map(|coordinate| Place {
                name: city.to_string(),
                coordinate: *coordinate,
            })
            .ok_or_else(|| UpstreamError::NotFound(city.to_string()))
    }
}

/// Answers with the routes registered for the destination point.
#[derive(Default)]
pub struct FakeRouter {
    pub calls: AtomicUsize,
    routes: Mutex<HashMap<String, Vec<EngineRoute>>>,
}

impl FakeRouter {
    pub fn add(&self, destination: Coordinate, routes: Vec<EngineRoute>) {
        self.routes.lock().unwrap().insert(key(destination), routes);
    }
}

#[async_trait]
impl RoutingEngine for FakeRouter {
    async fn route(
        &self,
        _origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<EngineRoute>, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.routes
            .lock()
            .unwrap()
            .get(&key(destination))
            .cloned()
            .ok_or(UpstreamError::NoRoute)
    }
}

/// AQI is 90 everywhere unless overridden; listed points fail.
#[derive(Default)]
pub struct FakeAqi {
    per_point: Mutex<HashMap<String, usize>>,
    readings: Mutex<HashMap<String, Option<u32>>>,
    failing: Mutex<HashSet<String>>,
}

impl FakeAqi {
    pub fn set(&self, at: Coordinate, reading: Option<u32>) {
        self.readings.lock().unwrap().insert(key(at), reading);
    }

    pub fn fail_at(&self, at: Coordinate) {
        self.failing.lock().unwrap().insert(key(at));
    }

    pub fn recover(&self) {
        self.failing.lock().unwrap().clear();
    }

    pub fn calls(&self) -> usize {
        self.per_point.lock().unwrap().values().sum()
    }

    pub fn calls_at(&self, at: Coordinate) -> usize {
        self.per_point
            .lock()
            .unwrap()
            .get(&key(at))
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl AqiLookup for FakeAqi {
    async fn lookup(&self, at: Coordinate) -> Result<Option<u32>, UpstreamError> {
        let k = key(at);
        *self.per_point.lock().unwrap().entry(k.clone()).or_default() += 1;
        if self.failing.lock().unwrap().contains(&k) {
            return Err(UpstreamError::Status {
                service: "aqi service",
                status: 503,
            });
        }
        Ok(self
            .readings
            .lock()
            .unwrap()
            .get(&k)
            .copied()
            .unwrap_or(Some(90)))
    }
}

#[derive(Default)]
pub struct FakeReverse {
    pub calls: AtomicUsize,
    pub fail: std::sync::atomic::AtomicBool,
    pub empty: std::sync::atomic::AtomicBool,
}

#[async_trait]
impl ReverseGeocoder for FakeReverse {
    async fn lookup(&self, at: Coordinate) -> Result<PlaceFields, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(UpstreamError::Timeout {
                service: "reverse geocoder",
            });
        }
        if self.empty.load(Ordering::SeqCst) {
            return Ok(PlaceFields::default());
        }
        Ok(PlaceFields {
            locality: Some(format!("Place {:.2}", at.lat)),
            country_name: Some("India".to_string()),
            ..PlaceFields::default()
        })
    }
}

#[derive(Default)]
pub struct FakeSources {
    pub calls: AtomicUsize,
}

#[async_trait]
impl PollutionSourceLookup for FakeSources {
    async fn count_sources(&self, _bbox: BoundingBox) -> Result<PollutionSources, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(PollutionSources {
            transport: 12,
            industry: 3,
            power: 1,
            construction: 4,
        })
    }
}

/// Answers every AQI and reverse lookup after `delay`, tracking how many
/// calls are in flight at once. Serves as both services so that a shared
/// permit pool can be observed across them.
pub struct GaugedService {
    delay: Duration,
    in_flight: AtomicUsize,
    pub peak: AtomicUsize,
    pub calls: AtomicUsize,
}

impl GaugedService {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    async fn enter(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl AqiLookup for GaugedService {
    async fn lookup(&self, _at: Coordinate) -> Result<Option<u32>, UpstreamError> {
        self.enter().await;
        Ok(Some(50))
    }
}

#[async_trait]
impl ReverseGeocoder for GaugedService {
    async fn lookup(&self, _at: Coordinate) -> Result<PlaceFields, UpstreamError> {
        self.enter().await;
        Ok(PlaceFields {
            locality: Some("Slow Town".to_string()),
            ..PlaceFields::default()
        })
    }
}

/// App state whose point lookups all go to `gauge`.
pub fn gauged_state(
    config: &Config,
    router: Arc<FakeRouter>,
    gauge: Arc<GaugedService>,
) -> Arc<AppState> {
    let upstreams = Upstreams {
        geocoder: Arc::new(FakeGeocoder::with_cities()),
        router,
        aqi: gauge.clone(),
        reverse: gauge,
        sources: Arc::new(FakeSources::default()),
    };
    let cache = Arc::new(MemoryCache::new(config.cache_max_entries));
    Arc::new(AppState::new(config, cache, upstreams))
}

pub struct Harness {
    pub geocoder: Arc<FakeGeocoder>,
    pub router: Arc<FakeRouter>,
    pub aqi: Arc<FakeAqi>,
    pub reverse: Arc<FakeReverse>,
    pub sources: Arc<FakeSources>,
    pub cache: Arc<MemoryCache>,
    pub state: Arc<AppState>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let geocoder = Arc::new(FakeGeocoder::with_cities());
        let router = Arc::new(FakeRouter::default());
        let aqi = Arc::new(FakeAqi::default());
        let reverse = Arc::new(FakeReverse::default());
        let sources = Arc::new(FakeSources::default());
        let cache = Arc::new(MemoryCache::new(config.cache_max_entries));

        let upstreams = Upstreams {
            geocoder: geocoder.clone(),
            router: router.clone(),
            aqi: aqi.clone(),
            reverse: reverse.clone(),
            sources: sources.clone(),
        };
        let state = Arc::new(AppState::new(&config, cache.clone(), upstreams));

        Self {
            geocoder,
            router,
            aqi,
            reverse,
            sources,
            cache,
            state,
        }
    }

    pub fn upstream_calls(&self) -> usize {
        self.geocoder.calls.load(Ordering::SeqCst)
            + self.router.calls.load(Ordering::SeqCst)
            + self.aqi.calls()
            + self.reverse.calls.load(Ordering::SeqCst)
    }
}

/// A route of `len` points whose listed indices sit on the given coordinates.
/// Filler points lie on distinct latitudes far from any fixture city.
pub fn route_through(
    len: usize,
    marked: &[(usize, Coordinate)],
    distance_meters: f64,
    duration_seconds: f64,
) -> EngineRoute {
    let mut geometry: Vec<[f64; 2]> = (0..len)
        .map(|i| [70.0, 10.0 + i as f64 * 0.01])
        .collect();
    for (index, at) in marked {
        geometry[*index] = [at.lon, at.lat];
    }
    EngineRoute {
        distance_meters,
        duration_seconds,
        geometry,
    }
}

/// A short route (step 25) of 101 points: 5 samples at 0, 25, 50, 75, 100.
pub fn five_sample_route(samples: [Coordinate; 5]) -> EngineRoute {
    let marked: Vec<(usize, Coordinate)> = samples
        .iter()
        .enumerate()
        .map(|(i, at)| (i * 25, *at))
        .collect();
    route_through(101, &marked, 20_000.0, 1_800.0)
}
