//! In-memory TTL cache.
//!
//! Entries are valid while `now - inserted_at < ttl`. Expired entries are
//! never evicted in the background; reads just treat them as absent and the
//! next `set` overwrites them.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::utils::Clock;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: DateTime<Utc>,
}

/// Keyed TTL cache safe to share across tasks.
///
/// Each entry is replaced whole on `set`, so a concurrent `get` sees either
/// the old value or the new one. Last write wins.
pub struct TtlCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            clock,
        }
    }

    /// Returns the value for `key` unless it was never set or has expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let entry = self.entries.get(key)?;
        if self.is_fresh(entry.inserted_at) {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    pub fn set(&self, key: impl Into<String>, value: V) {
        let entry = CacheEntry {
            value,
            inserted_at: self.clock.now(),
        };
        self.entries.insert(key.into(), entry);
    }

    /// Drop a single entry.
    pub fn invalidate(&self, key: &str) {
        self.entries.remove(key);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_fresh(&self, inserted_at: DateTime<Utc>) -> bool {
        let age_ms = self
            .clock
            .now()
            .signed_duration_since(inserted_at)
            .num_milliseconds();
        i128::from(age_ms) < self.ttl.as_millis() as i128
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ManualClock;
    use chrono::TimeZone;

    fn cache_with_clock() -> (TtlCache<String>, Arc<ManualClock>) {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let cache = TtlCache::new(Duration::from_millis(60_000), clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_never_set_is_absent() {
        let (cache, _) = cache_with_clock();
        assert_eq!(cache.get("quotes"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_valid_just_before_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.set("quotes", "v1".to_string());

        clock.advance(Duration::from_millis(59_999));
        assert_eq!(cache.get("quotes"), Some("v1".to_string()));
    }

    #[test]
    fn test_expired_at_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.set("quotes", "v1".to_string());

        clock.advance(Duration::from_millis(60_000));
        assert_eq!(cache.get("quotes"), None);
        // Lazy expiry keeps the entry around
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_set_overwrites_and_resets_age() {
        let (cache, clock) = cache_with_clock();
        cache.set("quotes", "v1".to_string());
        clock.advance(Duration::from_secs(50));
        cache.set("quotes", "v2".to_string());
        clock.advance(Duration::from_secs(50));

        assert_eq!(cache.get("quotes"), Some("v2".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate_and_clear() {
        let (cache, _) = cache_with_clock();
        cache.set("a", "1".to_string());
        cache.set("b", "2".to_string());

        cache.invalidate("a");
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some("2".to_string()));

        cache.clear();
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_writers_leave_one_whole_value() {
        let (cache, _) = cache_with_clock();
        let cache = Arc::new(cache);

        let writers: Vec<_> = (0..16)
            .map(|i| {
                let cache = cache.clone();
                tokio::spawn(async move {
                    cache.set("quotes", format!("value-{i}"));
                })
            })
            .collect();
        for w in writers {
            w.await.unwrap();
        }

        let value = cache.get("quotes").unwrap();
        assert!(value.starts_with("value-"));
        assert_eq!(cache.len(), 1);
    }
}
