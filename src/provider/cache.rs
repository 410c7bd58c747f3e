//! Response cache for the recipe provider
//!
//! Entries are keyed by endpoint path plus the sorted request parameters and
//! expire after a fixed TTL. The map is bounded: inserting past capacity
//! evicts the least recently used entry.

use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};
use url::form_urlencoded;

/// Default TTL for cached responses (5 minutes)
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Default number of cached responses
pub const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: Value,
    fetched_at: Instant,
    last_used: u64,
}

/// Bounded TTL cache of raw provider payloads
#[derive(Debug)]
pub struct ResponseCache {
    entries: HashMap<String, CacheEntry>,
    capacity: usize,
    ttl: Duration,
    tick: u64,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL)
    }
}

impl ResponseCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity.min(64)),
            capacity: capacity.max(1),
            ttl,
            tick: 0,
        }
    }

    /// Build the cache key for an endpoint and its parameters.
    ///
    /// Parameters are kept in a `BTreeMap`, so the serialization is
    /// independent of insertion order. Values are form-encoded, so a query
    /// containing `&` or `=` cannot pose as another parameter.
    pub fn key(endpoint: &str, params: &BTreeMap<String, String>) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.extend_pairs(params.iter());
        format!("{endpoint}?{}", query.finish())
    }

    pub fn get(&mut self, key: &str) -> Option<Value> {
        self.get_at(key, Instant::now())
    }

    /// Look up `key` as of `now`. Expired entries are reported as misses and
    /// left in place to be overwritten by the next insert.
    pub fn get_at(&mut self, key: &str, now: Instant) -> Option<Value> {
        self.tick += 1;
        let tick = self.tick;
        let ttl = self.ttl;

        let entry = self.entries.get_mut(key)?;
        if now.saturating_duration_since(entry.fetched_at) >= ttl {
            return None;
        }

        entry.last_used = tick;
        Some(entry.payload.clone())
    }

    pub fn insert(&mut self, key: String, payload: Value) {
        self.insert_at(key, payload, Instant::now());
    }

    pub fn insert_at(&mut self, key: String, payload: Value, now: Instant) {
        self.tick += 1;

        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_lru();
        }

        self.entries.insert(
            key,
            CacheEntry {
                payload,
                fetched_at: now,
                last_used: self.tick,
            },
        );
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_lru(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}
