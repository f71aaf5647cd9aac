use thiserror::Error;

use aqi_upstream::UpstreamError;

/// Failures that abort a route request. Per-point lookup failures never get here.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("{0}")]
    InvalidInput(String),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}
