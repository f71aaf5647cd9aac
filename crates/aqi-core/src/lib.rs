pub mod classify;
pub mod error;
pub mod models;
pub mod sampling;
pub mod summary;

pub use classify::{avg_speed_kmph, AqiCategory, Traffic, Zone};
pub use error::CoreError;
pub use models::{
    BoundingBox, Coordinate, EngineRoute, Place, PlaceFields, PollutionSegment, PollutionSources,
    RouteCandidate, RouteResponse, AREA_PLACEHOLDER,
};
pub use sampling::{sample_points, sampling_step, SamplingPolicy};
pub use summary::average_aqi;
