use std::sync::Arc;

use aqi_core::Coordinate;
use aqi_upstream::AqiLookup;

use super::PointLookup;
use crate::cache::{get_typed, keys, set_typed};

pub struct AqiResolver {
    service: Arc<dyn AqiLookup>,
    lookup: PointLookup,
}

impl AqiResolver {
    pub fn new(service: Arc<dyn AqiLookup>, lookup: PointLookup) -> Self {
        Self { service, lookup }
    }

    /// AQI at `at`, or `None` when unknown.
    ///
    /// A cached `None` (the service answered without a reading) is returned
    /// as-is. Errors and timeouts are not cached, so the next request retries.
    pub async fn resolve(&self, at: Coordinate) -> Option<u32> {
        let key = keys::aqi(at, self.lookup.precision);
        if let Some(cached) = get_typed::<Option<u32>>(self.lookup.cache.as_ref(), &key) {
            tracing::debug!("AQI cache hit {}", key);
            return cached;
        }

        let outcome = {
            let _permit = self.lookup.permits.acquire().await;
            tokio::time::timeout(self.lookup.timeout, self.service.lookup(at)).await
        };

        match outcome {
            Ok(Ok(reading)) => {
                set_typed(self.lookup.cache.as_ref(), &key, &reading, self.lookup.ttl);
                reading
            }
            Ok(Err(err)) => {
                tracing::warn!("AQI lookup failed for {}: {}", key, err);
                None
            }
            Err(_) => {
                tracing::warn!(
                    "AQI lookup for {} timed out after {:?}",
                    key,
                    self.lookup.timeout
                );
                None
            }
        }
    }
}
