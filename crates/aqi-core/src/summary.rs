//! Route-level statistics over enriched segments.

use crate::classify::{avg_speed_kmph, Traffic};
use crate::models::{Coordinate, PollutionSegment, RouteCandidate};

/// Rounded mean of the present values. `None` when nothing is present.
pub fn average_aqi<I>(values: I) -> Option<u32>
where
    I: IntoIterator<Item = Option<u32>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0u64, 0u64), |(sum, count), aqi| (sum + u64::from(aqi), count + 1));
    if count == 0 {
        return None;
    }
    Some((sum as f64 / count as f64).round() as u32)
}

pub fn format_distance(distance_km: f64) -> String {
    format!("{:.1} km", distance_km)
}

pub fn format_duration(duration_sec: f64) -> String {
    format!("{} min", (duration_sec / 60.0).round() as i64)
}

impl RouteCandidate {
    /// Summarise one enriched route. `id` is the route's index in the engine response.
    pub fn assemble(
        id: usize,
        distance_meters: f64,
        duration_seconds: f64,
        segments: Vec<PollutionSegment>,
        geometry: Vec<Coordinate>,
    ) -> Self {
        let distance_km = distance_meters / 1000.0;
        let speed = avg_speed_kmph(distance_km, duration_seconds);
        Self {
            id,
            name: format!("Route {}", id + 1),
            distance_km,
            duration_min: duration_seconds / 60.0,
            distance: format_distance(distance_km),
            duration: format_duration(duration_seconds),
            avg_aqi: average_aqi(segments.iter().map(|s| s.aqi)),
            traffic: Traffic::from_speed(speed),
            avg_speed_kmph: speed,
            segments,
            geometry,
        }
    }
}
