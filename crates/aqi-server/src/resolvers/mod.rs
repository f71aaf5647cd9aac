//! Per-point enrichment: AQI readings and place names.
//!
//! Both resolvers read through the shared cache, bound each upstream call
//! with a timeout, and never fail: a lookup error degrades to an unknown
//! reading or a placeholder label for that one point.

pub mod aqi;
pub mod area;

pub use aqi::AqiResolver;
pub use area::AreaResolver;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::cache::Cache;

/// Settings shared by both point resolvers.
#[derive(Clone)]
pub struct PointLookup {
    pub cache: Arc<dyn Cache>,
    /// How long successful lookups stay cached.
    pub ttl: Duration,
    /// Upper bound on a single upstream call.
    pub timeout: Duration,
    /// Decimal places kept in cache keys.
    pub precision: usize,
    /// Process-wide cap on in-flight upstream point lookups.
    pub permits: Arc<Semaphore>,
}

impl PointLookup {
    pub fn new(cache: Arc<dyn Cache>, ttl: Duration, timeout: Duration, precision: usize) -> Self {
        Self {
            cache,
            ttl,
            timeout,
            precision,
            permits: Arc::new(Semaphore::new(Semaphore::MAX_PERMITS)),
        }
    }

    pub fn with_permits(mut self, permits: Arc<Semaphore>) -> Self {
        self.permits = permits;
        self
    }
}
