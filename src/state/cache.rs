//! Short-lived cache of availability results

use crate::types::{AvailabilityResult, DomainKey};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Default time a result stays fresh
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
struct CacheEntry {
    result: AvailabilityResult,
    stored_at: Instant,
}

/// Maps a domain to its last known result.
///
/// Expiry is lazy: stale entries read as absent and are overwritten on the
/// next resolution. Nothing is ever evicted, so the map grows with the number
/// of distinct domains seen.
#[derive(Debug)]
pub struct ResultCache {
    entries: RwLock<HashMap<DomainKey, CacheEntry>>,
    ttl: Duration,
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh result for `domain`, if any
    pub fn get(&self, domain: &DomainKey) -> Option<AvailabilityResult> {
        let entries = self.entries.read();
        let entry = entries.get(domain)?;
        if entry.stored_at.elapsed() < self.ttl {
            Some(entry.result.clone())
        } else {
            None
        }
    }

    /// Store `result`, replacing whatever was there
    pub fn put(&self, domain: DomainKey, result: AvailabilityResult) {
        let entry = CacheEntry {
            result,
            stored_at: Instant::now(),
        };
        self.entries.write().insert(domain, entry);
    }

    /// Number of stored entries, stale ones included
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::normalize;
    use crate::types::{Availability, ProviderName};

    fn taken(domain: &DomainKey) -> AvailabilityResult {
        AvailabilityResult::resolved(domain.clone(), Availability::Taken, ProviderName::Rdap)
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = ResultCache::default();
        let key = normalize("google");
        let stored = taken(&key);
        cache.put(key.clone(), stored.clone());

        tokio::time::advance(Duration::from_secs(299)).await;
        assert_eq!(cache.get(&key), Some(stored));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get(&key).is_none());
        // Stale entries are not evicted
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_put_overwrites_including_errors() {
        let cache = ResultCache::default();
        let key = normalize("flaky");
        cache.put(key.clone(), taken(&key));
        cache.put(key.clone(), AvailabilityResult::all_providers_failed(key.clone()));

        let cached = cache.get(&key).unwrap();
        assert!(cached.is_error());
        assert!(!cached.available);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_missing_entry() {
        let cache = ResultCache::new(Duration::from_secs(1));
        assert!(cache.get(&normalize("nothing")).is_none());
        assert_eq!(cache.ttl(), Duration::from_secs(1));
    }
}
