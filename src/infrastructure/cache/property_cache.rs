//! In-memory TTL cache for processed properties.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, TimeDelta, Utc};
use lru::LruCache;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::domain::entities::ProcessedProperty;
use crate::domain::ports::{Clock, PropertyCachePort};
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::config::CacheConfig;

/// Default time-to-live of a cached record (30 minutes).
pub const DEFAULT_TTL_SECS: u64 = 30 * 60;

/// Default maximum number of cached records.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Default share of live records dropped when the cache is full.
pub const DEFAULT_EVICTION_FRACTION: f64 = 0.2;

#[derive(Debug, Clone)]
struct CacheEntry {
    data: ProcessedProperty,
    inserted_at: DateTime<Utc>,
    access_count: u64,
    last_access: DateTime<Utc>,
}

impl CacheEntry {
    fn new(data: ProcessedProperty, now: DateTime<Utc>) -> Self {
        Self {
            data,
            inserted_at: now,
            access_count: 1,
            last_access: now,
        }
    }

    fn is_expired(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        now - self.inserted_at > ttl
    }
}

/// Bounded TTL cache keyed by property id.
///
/// Entries expire a fixed time after insertion regardless of use. When an
/// insert would exceed capacity, expired entries are purged first; if the
/// cache is still full, the least accessed fraction of live entries is
/// dropped, least recently used first among equal counts.
pub struct PropertyCache {
    entries: Mutex<LruCache<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
    capacity: usize,
    eviction_fraction: f64,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl PropertyCache {
    /// Creates a cache with explicit limits.
    #[must_use]
    pub fn new(capacity: usize, ttl_secs: u64, clock: Arc<dyn Clock>) -> Self {
        let ttl = i64::try_from(ttl_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);

        Self {
            entries: Mutex::new(LruCache::unbounded()),
            clock,
            ttl,
            capacity: capacity.max(1),
            eviction_fraction: DEFAULT_EVICTION_FRACTION,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Creates a cache from configuration.
    #[must_use]
    pub fn from_config(config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let mut cache = Self::new(config.capacity, config.ttl_secs, clock);
        cache.eviction_fraction = config.eviction_fraction.clamp(0.0, 1.0);
        cache
    }

    /// Creates a cache with the default limits and the system clock.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL_SECS, Arc::new(SystemClock))
    }

    /// Returns the capacity bound.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Removes expired entries and returns how many were dropped.
    pub fn cleanup_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        let removed = Self::purge_expired(&mut entries, now, self.ttl);
        if removed > 0 {
            debug!(removed, "Purged expired properties from cache");
        }
        removed
    }

    /// Returns cache statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let entries = self.entries.lock();

        let size = entries.len();
        let total_accesses = entries.iter().map(|(_, e)| e.access_count).sum();
        let total_age_ms: i64 = entries
            .iter()
            .map(|(_, e)| (now - e.inserted_at).num_milliseconds())
            .sum();
        let average_age_secs = if size > 0 {
            total_age_ms as f64 / size as f64 / 1000.0
        } else {
            0.0
        };
        let last_access = entries.iter().map(|(_, e)| e.last_access).max();
        drop(entries);

        CacheStats {
            size,
            capacity: self.capacity,
            total_accesses,
            average_age_secs,
            last_access,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    fn purge_expired(
        entries: &mut LruCache<String, CacheEntry>,
        now: DateTime<Utc>,
        ttl: TimeDelta,
    ) -> usize {
        let expired: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now, ttl))
            .map(|(id, _)| id.clone())
            .collect();

        for id in &expired {
            entries.pop(id);
        }
        expired.len()
    }

    /// Drops the least accessed share of entries. Ties go to the least
    /// recently used entry.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn evict_least_accessed(&self, entries: &mut LruCache<String, CacheEntry>) -> usize {
        // `iter` yields most recent first; reverse so stable sort keeps LRU order on ties.
        let mut candidates: Vec<(String, u64)> = entries
            .iter()
            .rev()
            .map(|(id, entry)| (id.clone(), entry.access_count))
            .collect();
        candidates.sort_by_key(|(_, count)| *count);

        let target = ((candidates.len() as f64) * self.eviction_fraction).ceil() as usize;
        let target = target.max(1);

        for (id, _) in candidates.iter().take(target) {
            entries.pop(id);
        }
        target.min(candidates.len())
    }

    fn make_room(&self, entries: &mut LruCache<String, CacheEntry>, now: DateTime<Utc>) {
        let expired = Self::purge_expired(entries, now, self.ttl);
        let mut evicted = 0;
        if entries.len() >= self.capacity {
            evicted = self.evict_least_accessed(entries);
        }

        self.evictions
            .fetch_add((expired + evicted) as u64, Ordering::Relaxed);
        debug!(
            expired,
            evicted,
            remaining = entries.len(),
            "Property cache cleanup"
        );
    }
}

impl Default for PropertyCache {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for PropertyCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyCache")
            .field("len", &self.entries.lock().len())
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl PropertyCachePort for PropertyCache {
    fn get(&self, id: &str) -> Option<ProcessedProperty> {
        let now = self.clock.now();
        let mut entries = self.entries.lock();

        let expired = entries
            .peek(id)
            .map(|entry| entry.is_expired(now, self.ttl));

        match expired {
            Some(false) => {
                let entry = entries.get_mut(id)?;
                entry.access_count += 1;
                entry.last_access = now;
                self.hits.fetch_add(1, Ordering::Relaxed);
                trace!(id, access_count = entry.access_count, "Property cache hit");
                Some(entry.data.clone())
            }
            Some(true) => {
                entries.pop(id);
                self.misses.fetch_add(1, Ordering::Relaxed);
                trace!(id, "Property cache entry expired");
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                trace!(id, "Property cache miss");
                None
            }
        }
    }

    fn set(&self, id: &str, data: ProcessedProperty) {
        let now = self.clock.now();
        let mut entries = self.entries.lock();

        if !entries.contains(id) && entries.len() >= self.capacity {
            self.make_room(&mut entries, now);
        }

        trace!(id, "Storing property in cache");
        entries.put(id.to_string(), CacheEntry::new(data, now));
    }

    fn has(&self, id: &str) -> bool {
        let now = self.clock.now();
        let mut entries = self.entries.lock();

        match entries.peek(id).map(|e| e.is_expired(now, self.ttl)) {
            Some(false) => true,
            Some(true) => {
                entries.pop(id);
                false
            }
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.entries.lock().len()
    }

    fn clear(&self) {
        self.entries.lock().clear();
        debug!("Cleared property cache");
    }
}

/// Observational statistics about the property cache.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Current number of cached records.
    pub size: usize,
    /// Capacity bound.
    pub capacity: usize,
    /// Sum of access counts over stored records.
    pub total_accesses: u64,
    /// Mean time since insertion, in seconds.
    pub average_age_secs: f64,
    /// Most recent access over stored records.
    pub last_access: Option<DateTime<Utc>>,
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Number of records dropped by cleanup passes.
    pub evictions: u64,
}

impl CacheStats {
    /// Hit rate as a percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            (self.hits as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cache: {}/{} properties, {} accesses, avg age {:.1}s, {:.1}% hit rate",
            self.size,
            self.capacity,
            self.total_accesses,
            self.average_age_secs,
            self.hit_rate()
        )
    }
}
