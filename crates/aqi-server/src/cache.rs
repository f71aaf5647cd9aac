//! Process-wide key/value cache with per-entry TTL.
//!
//! One store holds three namespaces, told apart by key prefix:
//! `route:` (full responses), `aqi:` (point readings) and `rev:` (place names).
//! Values are JSON documents; a document that no longer decodes to the
//! expected type is dropped and reported as a miss.

use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};

use aqi_core::Coordinate;

pub trait Cache: Send + Sync {
    /// Live value for `key`. Expired entries read as absent and are purged.
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value, ttl: Duration);
    fn remove(&self, key: &str);
}

pub trait CacheEntry {
    fn inserted_at(&self) -> Instant;
    fn expires_at(&self) -> Instant;
}

pub fn prune_cache<V>(cache: &DashMap<String, V>, max_entries: usize, now: Instant) -> usize
where
    V: CacheEntry,
{
    let before = cache.len();
    let mut entries: Vec<(String, Instant, Instant)> = cache
        .iter()
        .map(|entry| {
            let value = entry.value();
            (entry.key().clone(), value.inserted_at(), value.expires_at())
        })
        .collect();

    for (key, _, expires_at) in &entries {
        if now >= *expires_at {
            cache.remove(key);
        }
    }

    if max_entries == 0 || cache.len() <= max_entries {
        return before.saturating_sub(cache.len());
    }

    entries.retain(|(_, _, expires_at)| now < *expires_at);
    entries.sort_by_key(|(_, inserted_at, _)| *inserted_at);
    for (key, _, _) in entries {
        if cache.len() <= max_entries {
            break;
        }
        cache.remove(&key);
    }
    before.saturating_sub(cache.len())
}

#[derive(Debug, Clone)]
struct StoredEntry {
    value: Value,
    inserted_at: Instant,
    expires_at: Instant,
}

impl CacheEntry for StoredEntry {
    fn inserted_at(&self) -> Instant {
        self.inserted_at
    }

    fn expires_at(&self) -> Instant {
        self.expires_at
    }
}

/// In-memory [`Cache`] backed by `DashMap`. Concurrent writes to the same key
/// are last-write-wins.
pub struct MemoryCache {
    entries: DashMap<String, StoredEntry>,
    max_entries: usize,
}

impl MemoryCache {
    /// `max_entries == 0` leaves the store unbounded.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop expired entries, then the oldest until within capacity.
    pub fn sweep(&self) -> usize {
        prune_cache(&self.entries, self.max_entries, Instant::now())
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if now < entry.expires_at {
                return Some(entry.value.clone());
            }
        } else {
            return None;
        }

        self.entries.remove_if(key, |_, entry| now >= entry.expires_at);
        None
    }

    fn set(&self, key: &str, value: Value, ttl: Duration) {
        let now = Instant::now();
        self.entries.insert(
            key.to_string(),
            StoredEntry {
                value,
                inserted_at: now,
                expires_at: now + ttl,
            },
        );
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}

/// Typed read. A stored document of the wrong shape is removed and read as a miss.
pub fn get_typed<T: DeserializeOwned>(cache: &dyn Cache, key: &str) -> Option<T> {
    let value = cache.get(key)?;
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            tracing::warn!("Discarding malformed cache entry {}: {}", key, err);
            cache.remove(key);
            None
        }
    }
}

pub fn set_typed<T: Serialize>(cache: &dyn Cache, key: &str, value: &T, ttl: Duration) {
    match serde_json::to_value(value) {
        Ok(document) => cache.set(key, document, ttl),
        Err(err) => tracing::warn!("Skipping cache write for {}: {}", key, err),
    }
}

pub mod keys {
    use super::Coordinate;

    /// Literal city strings, case-sensitive and un-normalised.
    pub fn route(origin: &str, destination: &str) -> String {
        format!("route:{}:{}", origin, destination)
    }

    pub fn aqi(at: Coordinate, precision: usize) -> String {
        format!("aqi:{}", at.key(precision))
    }

    pub fn area(at: Coordinate, precision: usize) -> String {
        format!("rev:{}", at.key(precision))
    }
}
