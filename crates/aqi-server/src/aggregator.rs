//! Turns routing-engine alternatives into enriched route candidates.

use futures::future::join_all;
use futures::stream::{self, StreamExt};

use aqi_core::{Coordinate, EngineRoute, PollutionSegment, RouteCandidate, SamplingPolicy};

use crate::resolvers::{AqiResolver, AreaResolver};

pub struct RouteAggregator {
    aqi: AqiResolver,
    area: AreaResolver,
    sampling: SamplingPolicy,
    /// Concurrent point lookups per route.
    concurrency: usize,
}

impl RouteAggregator {
    pub fn new(
        aqi: AqiResolver,
        area: AreaResolver,
        sampling: SamplingPolicy,
        concurrency: usize,
    ) -> Self {
        Self {
            aqi,
            area,
            sampling,
            concurrency: concurrency.max(1),
        }
    }

    /// One candidate per engine route, in engine order. Routes are processed concurrently.
    pub async fn aggregate(&self, routes: Vec<EngineRoute>) -> Vec<RouteCandidate> {
        join_all(
            routes
                .into_iter()
                .enumerate()
                .map(|(id, route)| self.aggregate_route(id, route)),
        )
        .await
    }

    pub async fn aggregate_route(&self, id: usize, route: EngineRoute) -> RouteCandidate {
        let geometry = route.coordinates();
        let samples = self.sampling.sample(&geometry, route.distance_km());
        tracing::debug!(
            "Route {}: {} geometry points, {} sampled",
            id,
            geometry.len(),
            samples.len()
        );

        let segments = self.enrich(&samples).await;
        RouteCandidate::assemble(
            id,
            route.distance_meters,
            route.duration_seconds,
            segments,
            geometry,
        )
    }

    /// Resolve AQI and area for every point. Completion order is arbitrary;
    /// results are put back in sample order.
    async fn enrich(&self, points: &[Coordinate]) -> Vec<PollutionSegment> {
        let mut resolved: Vec<(usize, PollutionSegment)> =
            stream::iter(points.iter().copied().enumerate())
                .map(|(index, point)| async move {
                    let (aqi, area) =
                        tokio::join!(self.aqi.resolve(point), self.area.resolve(point));
                    (index, PollutionSegment::new(point, aqi, area))
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;

        resolved.sort_by_key(|(index, _)| *index);
        resolved.into_iter().map(|(_, segment)| segment).collect()
    }
}
