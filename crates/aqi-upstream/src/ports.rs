//! Collaborator interfaces consumed by the route pipeline.
//!
//! The services behind them are third-party and rate-limited. The HTTP
//! adapters in this crate implement them; tests swap in fakes.

use async_trait::async_trait;

use aqi_core::{BoundingBox, Coordinate, EngineRoute, Place, PlaceFields, PollutionSources};

use crate::UpstreamError;

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve a city name. Fails with [`UpstreamError::NotFound`] for unknown cities.
    async fn geocode(&self, city: &str) -> Result<Place, UpstreamError>;
}

#[async_trait]
pub trait RoutingEngine: Send + Sync {
    /// Driving alternatives between two points, in engine order.
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<EngineRoute>, UpstreamError>;
}

#[async_trait]
pub trait AqiLookup: Send + Sync {
    /// `Ok(None)` means the service answered but has no reading for the point.
    async fn lookup(&self, at: Coordinate) -> Result<Option<u32>, UpstreamError>;
}

#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn lookup(&self, at: Coordinate) -> Result<PlaceFields, UpstreamError>;
}

#[async_trait]
pub trait PollutionSourceLookup: Send + Sync {
    async fn count_sources(&self, bbox: BoundingBox) -> Result<PollutionSources, UpstreamError>;
}
