//! Route geometry sampling.
//!
//! A dense route geometry can hold thousands of points. Every sampled point
//! costs one paid AQI lookup and one reverse-geocode, so the stride grows with
//! route length.

use crate::models::Coordinate;

pub const SHORT_ROUTE_STEP: usize = 25;
pub const LONG_ROUTE_STEP: usize = 80;
/// Routes strictly longer than this use [`LONG_ROUTE_STEP`].
pub const LONG_ROUTE_THRESHOLD_KM: f64 = 50.0;

pub fn sampling_step(distance_km: f64) -> usize {
    if distance_km > LONG_ROUTE_THRESHOLD_KM {
        LONG_ROUTE_STEP
    } else {
        SHORT_ROUTE_STEP
    }
}

/// Every `step`-th coordinate starting at index 0.
pub fn sample_points(geometry: &[Coordinate], step: usize) -> Vec<Coordinate> {
    geometry.iter().copied().step_by(step.max(1)).collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SamplingPolicy {
    /// Append the last geometry point when the stride skipped it.
    pub include_final_point: bool,
}

impl SamplingPolicy {
    pub fn sample(&self, geometry: &[Coordinate], distance_km: f64) -> Vec<Coordinate> {
        let step = sampling_step(distance_km);
        let mut points = sample_points(geometry, step);
        if self.include_final_point && !geometry.is_empty() && (geometry.len() - 1) % step != 0 {
            if let Some(last) = geometry.last() {
                points.push(*last);
            }
        }
        points
    }
}
