use std::sync::Arc;

use aqi_core::{Coordinate, AREA_PLACEHOLDER};
use aqi_upstream::ReverseGeocoder;

use super::PointLookup;
use crate::cache::{get_typed, keys, set_typed};

pub struct AreaResolver {
    service: Arc<dyn ReverseGeocoder>,
    lookup: PointLookup,
}

impl AreaResolver {
    pub fn new(service: Arc<dyn ReverseGeocoder>, lookup: PointLookup) -> Self {
        Self { service, lookup }
    }

    /// Place name for `at`. Falls back to [`AREA_PLACEHOLDER`], which is never cached.
    pub async fn resolve(&self, at: Coordinate) -> String {
        let key = keys::area(at, self.lookup.precision);
        if let Some(cached) = get_typed::<String>(self.lookup.cache.as_ref(), &key) {
            tracing::debug!("Area cache hit {}", key);
            return cached;
        }

        let outcome = {
            let _permit = self.lookup.permits.acquire().await;
            tokio::time::timeout(self.lookup.timeout, self.service.lookup(at)).await
        };

        match outcome {
            Ok(Ok(fields)) => match fields.label() {
                Some(label) => {
                    let label = label.to_string();
                    set_typed(self.lookup.cache.as_ref(), &key, &label, self.lookup.ttl);
                    label
                }
                None => AREA_PLACEHOLDER.to_string(),
            },
            Ok(Err(err)) => {
                tracing::warn!("Reverse geocode failed for {}: {}", key, err);
                AREA_PLACEHOLDER.to_string()
            }
            Err(_) => {
                tracing::warn!(
                    "Reverse geocode for {} timed out after {:?}",
                    key,
                    self.lookup.timeout
                );
                AREA_PLACEHOLDER.to_string()
            }
        }
    }
}
