use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::domain::fingerprint::Fingerprint;
use crate::ports::Clock;

pub const DEFAULT_MAX_ENTRIES: usize = 100;
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// Bounded store of analysis results with time-based expiry.
///
/// Expired entries are hidden from `get` but keep their slot until the
/// size-based eviction removes them or they are overwritten.
pub struct RequestCache<V> {
    entries: HashMap<Fingerprint, CacheEntry<V>>,
    max_entries: usize,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> RequestCache<V> {
    /// A cache of `max_entries` slots; zero disables caching.
    pub fn new(max_entries: usize, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::with_capacity(max_entries.min(DEFAULT_MAX_ENTRIES)),
            max_entries,
            ttl,
            clock,
        }
    }

    pub fn put(&mut self, key: Fingerprint, value: V) {
        if self.max_entries == 0 {
            return;
        }

        if self.entries.len() >= self.max_entries {
            self.evict_oldest();
        }

        self.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: self.clock.now(),
            },
        );
    }

    pub fn get(&self, key: &Fingerprint) -> Option<V> {
        let entry = self.entries.get(key)?;
        let age = self.clock.now().saturating_duration_since(entry.inserted_at);
        (age < self.ttl).then(|| entry.value.clone())
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.inserted_at)
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            self.entries.remove(&key);
            tracing::debug!(fingerprint = %key, "Evicted oldest cache entry");
        }
    }

    /// Number of occupied slots, expired entries included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
