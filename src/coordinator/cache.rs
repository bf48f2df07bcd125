//! TTL cache for fetch results
//!
//! Owned by the coordinator and passed to it by reference, with an
//! injectable clock so expiry can be driven by tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::models::ComparisonSet;

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        match self.now.lock() {
            Ok(now) => *now,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// One cached fetch result
#[derive(Debug, Clone)]
pub struct RequestCacheEntry {
    pub data: Arc<ComparisonSet>,
    pub fetched_at: Instant,
}

/// In-memory cache of fetch results keyed by request key.
///
/// Reads return `None` once an entry is older than the TTL, causing the
/// next caller to refetch. Expired entries are replaced on the next insert.
pub struct ResponseCache {
    entries: Mutex<HashMap<String, RequestCacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh entry for `key`, if any
    pub fn get(&self, key: &str) -> Option<Arc<ComparisonSet>> {
        let entries = self.entries.lock().ok()?;
        let entry = entries.get(key)?;
        let age = self.clock.now().saturating_duration_since(entry.fetched_at);
        if age < self.ttl {
            Some(Arc::clone(&entry.data))
        } else {
            None
        }
    }

    pub fn insert(&self, key: String, data: Arc<ComparisonSet>) {
        if let Ok(mut entries) = self.entries.lock() {
            let fetched_at = self.clock.now();
            entries.retain(|_, e| fetched_at.saturating_duration_since(e.fetched_at) < self.ttl);
            entries.insert(key, RequestCacheEntry { data, fetched_at });
        }
    }

    /// Drop every cached entry
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(ttl_secs: u64) -> (ResponseCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = ResponseCache::with_clock(Duration::from_secs(ttl_secs), clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_get_fresh_entry() {
        let (cache, clock) = cache(30);
        let data = Arc::new(ComparisonSet::default());
        cache.insert("k".to_string(), Arc::clone(&data));

        clock.advance(Duration::from_secs(29));
        let hit = cache.get("k").unwrap();
        assert!(Arc::ptr_eq(&hit, &data));
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let (cache, clock) = cache(30);
        cache.insert("k".to_string(), Arc::new(ComparisonSet::default()));

        clock.advance(Duration::from_secs(30));
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn test_missing_key() {
        let (cache, _) = cache(30);
        assert!(cache.get("absent").is_none());
    }

    #[test]
    fn test_insert_prunes_expired_entries() {
        let (cache, clock) = cache(10);
        cache.insert("old".to_string(), Arc::new(ComparisonSet::default()));
        clock.advance(Duration::from_secs(11));
        cache.insert("new".to_string(), Arc::new(ComparisonSet::default()));
        assert_eq!(cache.len(), 1);
        assert!(cache.get("new").is_some());
    }

    #[test]
    fn test_clear() {
        let (cache, _) = cache(30);
        cache.insert("k".to_string(), Arc::new(ComparisonSet::default()));
        assert!(!cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());
    }
}
