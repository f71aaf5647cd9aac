//! Application state: the cache and the services built on top of it.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

use aqi_core::SamplingPolicy;
use aqi_upstream::{
    build_client, AqiLookup, BigDataCloudClient, Geocoder, NominatimGeocoder, OsrmClient,
    OverpassClient, PollutionSourceLookup, ReverseGeocoder, RoutingEngine, WaqiClient,
};

use crate::aggregator::RouteAggregator;
use crate::cache::{Cache, MemoryCache};
use crate::config::Config;
use crate::resolvers::{AqiResolver, AreaResolver, PointLookup};
use crate::route_service::RouteService;

/// The external collaborators, behind their traits.
#[derive(Clone)]
pub struct Upstreams {
    pub geocoder: Arc<dyn Geocoder>,
    pub router: Arc<dyn RoutingEngine>,
    pub aqi: Arc<dyn AqiLookup>,
    pub reverse: Arc<dyn ReverseGeocoder>,
    pub sources: Arc<dyn PollutionSourceLookup>,
}

impl Upstreams {
    /// HTTP adapters for the configured public services.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = build_client(
            &config.user_agent,
            Duration::from_secs(config.connect_timeout_s),
        )?;

        Ok(Self {
            geocoder: Arc::new(
                NominatimGeocoder::new(
                    http.clone(),
                    &config.geocoder_url,
                    Duration::from_secs(config.geocoder_timeout_s),
                )
                .with_country_codes(config.geocoder_country_codes.clone()),
            ),
            router: Arc::new(OsrmClient::new(
                http.clone(),
                &config.routing_url,
                Duration::from_secs(config.routing_timeout_s),
            )),
            aqi: Arc::new(WaqiClient::new(
                http.clone(),
                &config.aqi_url,
                &config.aqi_token,
                Duration::from_secs(config.aqi_timeout_s),
            )),
            reverse: Arc::new(BigDataCloudClient::new(
                http.clone(),
                &config.reverse_geocoder_url,
                Duration::from_secs(config.reverse_geocoder_timeout_s),
            )),
            sources: Arc::new(OverpassClient::new(
                http,
                &config.overpass_url,
                Duration::from_secs(config.overpass_timeout_s),
            )),
        })
    }
}

/// Shared across all handlers. Built once at startup; the cache lives for the
/// whole process.
pub struct AppState {
    pub cache: Arc<MemoryCache>,
    pub routes: RouteService,
    pub sources: Arc<dyn PollutionSourceLookup>,
}

impl AppState {
    pub fn new(config: &Config, cache: Arc<MemoryCache>, upstreams: Upstreams) -> Self {
        let shared: Arc<dyn Cache> = cache.clone();
        let permits = Arc::new(Semaphore::new(config.upstream_max_in_flight.max(1)));
        let point_ttl = Duration::from_secs(config.point_cache_ttl_s);

        let aqi_lookup = PointLookup::new(
            shared.clone(),
            point_ttl,
            Duration::from_secs(config.aqi_timeout_s),
            config.coord_precision,
        )
        .with_permits(permits.clone());
        let area_lookup = PointLookup::new(
            shared.clone(),
            point_ttl,
            Duration::from_secs(config.reverse_geocoder_timeout_s),
            config.coord_precision,
        )
        .with_permits(permits);

        let aggregator = RouteAggregator::new(
            AqiResolver::new(upstreams.aqi, aqi_lookup),
            AreaResolver::new(upstreams.reverse, area_lookup),
            SamplingPolicy {
                include_final_point: config.sample_include_final_point,
            },
            config.enrich_concurrency,
        );

        let routes = RouteService::new(
            shared,
            upstreams.geocoder,
            upstreams.router,
            aggregator,
            Duration::from_secs(config.route_cache_ttl_s),
        );

        Self {
            cache,
            routes,
            sources: upstreams.sources,
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let cache = Arc::new(MemoryCache::new(config.cache_max_entries));
        Ok(Self::new(config, cache, Upstreams::from_config(config)?))
    }
}
