//! Upstream service clients.
//!
//! Traits for every collaborator the route pipeline consumes, plus reqwest
//! adapters for the public services used in production.

pub mod aqi;
pub mod error;
pub mod geocoder;
pub mod http;
pub mod overpass;
pub mod ports;
pub mod reverse;
pub mod routing;

pub use aqi::WaqiClient;
pub use error::UpstreamError;
pub use geocoder::NominatimGeocoder;
pub use http::build_client;
pub use overpass::OverpassClient;
pub use ports::{AqiLookup, Geocoder, PollutionSourceLookup, ReverseGeocoder, RoutingEngine};
pub use reverse::BigDataCloudClient;
pub use routing::OsrmClient;
