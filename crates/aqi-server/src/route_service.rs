//! Request-level cache gate around the full route pipeline.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use aqi_core::RouteResponse;
use aqi_upstream::{Geocoder, RoutingEngine};

use crate::aggregator::RouteAggregator;
use crate::cache::{get_typed, keys, set_typed, Cache};
use crate::error::RouteError;

const MIN_CITY_LEN: usize = 2;
const KEY_SEPARATOR: char = ':';

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    #[serde(default)]
    pub origin_city: Option<String>,
    #[serde(default)]
    pub destination_city: Option<String>,
}

impl RouteRequest {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin_city: Some(origin.into()),
            destination_city: Some(destination.into()),
        }
    }

    /// Both city names exactly as supplied.
    pub fn validate(&self) -> Result<(&str, &str), RouteError> {
        let origin = present(&self.origin_city);
        let destination = present(&self.destination_city);
        let (Some(origin), Some(destination)) = (origin, destination) else {
            return Err(RouteError::InvalidInput(
                "originCity and destinationCity required".to_string(),
            ));
        };
        check_city("originCity", origin)?;
        check_city("destinationCity", destination)?;
        Ok((origin, destination))
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// `:` separates the two names in the route cache key, so it cannot appear in either.
fn check_city(field: &str, value: &str) -> Result<(), RouteError> {
    if value.trim().chars().count() < MIN_CITY_LEN {
        return Err(RouteError::InvalidInput(format!(
            "{} must be at least {} characters",
            field, MIN_CITY_LEN
        )));
    }
    if value.contains(KEY_SEPARATOR) {
        return Err(RouteError::InvalidInput(format!(
            "{} must not contain '{}'",
            field, KEY_SEPARATOR
        )));
    }
    Ok(())
}

pub struct RouteService {
    cache: Arc<dyn Cache>,
    geocoder: Arc<dyn Geocoder>,
    router: Arc<dyn RoutingEngine>,
    aggregator: RouteAggregator,
    response_ttl: Duration,
}

impl RouteService {
    pub fn new(
        cache: Arc<dyn Cache>,
        geocoder: Arc<dyn Geocoder>,
        router: Arc<dyn RoutingEngine>,
        aggregator: RouteAggregator,
        response_ttl: Duration,
    ) -> Self {
        Self {
            cache,
            geocoder,
            router,
            aggregator,
            response_ttl,
        }
    }

    /// Serve a cached response for the exact city pair, or build and cache a new one.
    ///
    /// A cached response is returned verbatim until its TTL lapses, even if the
    /// point entries it was built from have since expired.
    pub async fn plan(&self, request: &RouteRequest) -> Result<RouteResponse, RouteError> {
        let (origin_city, destination_city) = request.validate()?;
        let key = keys::route(origin_city, destination_city);

        if let Some(cached) = get_typed::<RouteResponse>(self.cache.as_ref(), &key) {
            tracing::debug!("Route cache hit {}", key);
            return Ok(cached);
        }
        tracing::debug!("Route cache miss {}", key);

        let (origin, destination) = tokio::try_join!(
            self.geocoder.geocode(origin_city.trim()),
            self.geocoder.geocode(destination_city.trim()),
        )?;

        let engine_routes = self
            .router
            .route(origin.coordinate, destination.coordinate)
            .await?;

        let routes = self.aggregator.aggregate(engine_routes).await;
        tracing::info!(
            "Built {} route(s) for {} -> {}",
            routes.len(),
            origin.name,
            destination.name
        );

        let response = RouteResponse {
            origin,
            destination,
            routes,
            generated_at: Utc::now(),
        };
        set_typed(self.cache.as_ref(), &key, &response, self.response_ttl);
        Ok(response)
    }
}
