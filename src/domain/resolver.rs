//! Provider cascade for a single domain

use crate::domain::AvailabilityProvider;
use crate::error::DomainRadarError;
use crate::state::{QuotaTracker, ResultCache};
use crate::types::{AvailabilityResult, DomainKey, ErrorKind, ResolverStats};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;

/// Outer guard on a provider call; providers apply their own, tighter, timeout
const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-key lock held while a cascade for that key is running
type KeyLock = Arc<tokio::sync::Mutex<()>>;

/// Walks the provider list in order until one of them gives a definitive
/// answer, honoring quotas and the result cache.
///
/// Concurrent resolves of the same key are coalesced: the first caller runs
/// the cascade, later callers wait for it and read its cached result.
pub struct FallbackResolver {
    providers: Vec<Arc<dyn AvailabilityProvider>>,
    quota: Arc<QuotaTracker>,
    cache: Arc<ResultCache>,
    stats: Arc<ResolverStats>,
    call_timeout: Duration,
    in_flight: Mutex<HashMap<DomainKey, KeyLock>>,
}

impl FallbackResolver {
    pub fn new(
        providers: Vec<Arc<dyn AvailabilityProvider>>,
        quota: Arc<QuotaTracker>,
        cache: Arc<ResultCache>,
    ) -> Self {
        Self {
            providers,
            quota,
            cache,
            stats: Arc::new(ResolverStats::new()),
            call_timeout: DEFAULT_CALL_TIMEOUT,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_stats(mut self, stats: Arc<ResolverStats>) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn stats(&self) -> &ResolverStats {
        &self.stats
    }

    /// Resolve one domain.
    ///
    /// Never fails: when no provider produces an answer the result carries
    /// `ErrorKind::AllProvidersFailed`, and that result is cached like any other.
    pub async fn resolve(&self, domain: &DomainKey) -> AvailabilityResult {
        if let Some(cached) = self.cached(domain) {
            return cached;
        }

        let key_lock = {
            let mut in_flight = self.in_flight.lock();
            Arc::clone(in_flight.entry(domain.clone()).or_default())
        };

        let result = {
            let _guard = key_lock.lock().await;
            // Another caller may have finished this key while we waited
            match self.cached(domain) {
                Some(cached) => cached,
                None => {
                    self.stats.increment_cache_misses();
                    self.cascade(domain).await
                }
            }
        };

        let mut in_flight = self.in_flight.lock();
        // Only the map and this caller still hold the lock: nobody else is waiting
        if Arc::strong_count(&key_lock) == 2 {
            in_flight.remove(domain);
        }
        result
    }

    fn cached(&self, domain: &DomainKey) -> Option<AvailabilityResult> {
        let cached = self.cache.get(domain)?;
        self.stats.increment_cache_hits();
        tracing::debug!(domain = %domain, "Cache hit");
        Some(cached)
    }

    async fn cascade(&self, domain: &DomainKey) -> AvailabilityResult {
        for provider in &self.providers {
            let name = provider.name();

            if !provider.is_configured() {
                tracing::trace!(domain = %domain, provider = %name, "Provider not configured, skipping");
                continue;
            }

            let Some(reservation) = self.quota.try_reserve(name) else {
                self.stats.increment_quota_skips();
                tracing::debug!(domain = %domain, provider = %name, "Quota exhausted, skipping");
                continue;
            };

            self.stats.increment_provider_calls();
            let started = Instant::now();
            let outcome = match timeout(self.call_timeout, provider.check(domain)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(DomainRadarError::timeout(
                    format!("{} check", name),
                    self.call_timeout,
                )),
            };
            let duration_ms = started.elapsed().as_millis() as u64;

            match outcome {
                Ok(availability) => {
                    tracing::debug!(
                        domain = %domain,
                        provider = %name,
                        available = availability.is_available(),
                        duration_ms,
                        "Provider answered"
                    );
                    let result = AvailabilityResult::resolved(domain.clone(), availability, name);
                    self.cache.put(domain.clone(), result.clone());
                    return result;
                }
                Err(e) => match e.kind() {
                    ErrorKind::RateLimited => {
                        // Rejected calls do not count against the quota
                        self.quota.release(reservation);
                        self.stats.increment_rate_limited();
                        tracing::warn!(domain = %domain, provider = %name, error = %e, "Provider rate limited");
                    }
                    ErrorKind::ConfigurationMissing => {
                        self.quota.release(reservation);
                        tracing::debug!(domain = %domain, provider = %name, error = %e, "Provider cannot serve domain");
                    }
                    _ => {
                        self.stats.increment_provider_errors();
                        tracing::debug!(
                            domain = %domain,
                            provider = %name,
                            error = %e,
                            duration_ms,
                            "Provider check failed"
                        );
                    }
                },
            }
        }

        self.stats.increment_exhausted();
        tracing::warn!(domain = %domain, providers = self.providers.len(), "All providers failed");
        let result = AvailabilityResult::all_providers_failed(domain.clone());
        self.cache.put(domain.clone(), result.clone());
        result
    }
}
