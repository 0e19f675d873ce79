//! Paced, grouped resolution of candidate batches

use crate::domain::{DomainNormalizer, FallbackResolver};
use crate::types::AvailabilityResult;
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default number of domains resolved concurrently
pub const DEFAULT_BATCH_SIZE: usize = 3;

/// Default pause between consecutive groups
pub const DEFAULT_BATCH_PACING: Duration = Duration::from_secs(2);

/// Drives a list of candidates through the resolver.
///
/// Candidates are split into groups of `batch_size`. Each group is resolved
/// concurrently; the next group starts `pacing` after the previous one
/// finished, keeping the aggregate request rate under upstream limits.
pub struct BatchScheduler {
    resolver: Arc<FallbackResolver>,
    normalizer: DomainNormalizer,
    batch_size: usize,
    pacing: Duration,
}

impl BatchScheduler {
    pub fn new(resolver: Arc<FallbackResolver>, normalizer: DomainNormalizer) -> Self {
        Self {
            resolver,
            normalizer,
            batch_size: DEFAULT_BATCH_SIZE,
            pacing: DEFAULT_BATCH_PACING,
        }
    }

    /// Group size; zero is treated as one
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn pacing(&self) -> Duration {
        self.pacing
    }

    pub fn normalizer(&self) -> &DomainNormalizer {
        &self.normalizer
    }

    /// Resolve every candidate, returning results in input order
    pub async fn resolve_all<S: AsRef<str>>(&self, candidates: &[S]) -> Vec<AvailabilityResult> {
        if candidates.is_empty() {
            return Vec::new();
        }

        let batch_start = Instant::now();
        let keys = self.normalizer.normalize_all(candidates);
        let groups = keys.len().div_ceil(self.batch_size);
        let mut results = Vec::with_capacity(keys.len());

        for (index, group) in keys.chunks(self.batch_size).enumerate() {
            if index > 0 && !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }

            let group_results = join_all(group.iter().map(|key| self.resolver.resolve(key))).await;
            tracing::debug!(group = index + 1, groups, size = group.len(), "Group resolved");
            results.extend(group_results);
        }

        let failures = results.iter().filter(|r| r.is_error()).count();
        tracing::info!(
            domains_requested = candidates.len(),
            groups,
            failures,
            batch_duration_ms = batch_start.elapsed().as_millis() as u64,
            "Batch availability check completed"
        );

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AvailabilityProvider;
    use crate::error::Result;
    use crate::state::{QuotaTracker, ResultCache};
    use crate::types::{Availability, DomainKey, ProviderName};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Answers after a per-domain delay and records when each call started
    struct DelayedProvider {
        started: Mutex<Vec<(String, tokio::time::Instant)>>,
    }

    #[async_trait]
    impl AvailabilityProvider for DelayedProvider {
        async fn check(&self, domain: &DomainKey) -> Result<Availability> {
            self.started
                .lock()
                .push((domain.label().to_string(), tokio::time::Instant::now()));
            let delay = match domain.label() {
                "a" => 300,
                "b" => 100,
                _ => 10,
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            if domain.label() == "b" {
                Ok(Availability::Available)
            } else {
                Ok(Availability::Taken)
            }
        }

        fn name(&self) -> ProviderName {
            ProviderName::Rdap
        }
    }

    fn scheduler(provider: Arc<DelayedProvider>) -> BatchScheduler {
        let quota = QuotaTracker::new();
        quota.register(ProviderName::Rdap, 100, Duration::from_secs(3600));
        let resolver = FallbackResolver::new(
            vec![provider as Arc<dyn AvailabilityProvider>],
            Arc::new(quota),
            Arc::new(ResultCache::default()),
        );
        BatchScheduler::new(Arc::new(resolver), DomainNormalizer::new())
    }

    fn delayed() -> Arc<DelayedProvider> {
        Arc::new(DelayedProvider {
            started: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_keep_input_order() {
        let scheduler = scheduler(delayed());
        let results = scheduler.resolve_all(&["a", "b", "c", "d"]).await;

        let domains: Vec<&str> = results.iter().map(|r| r.domain.as_str()).collect();
        assert_eq!(domains, ["a.com", "b.com", "c.com", "d.com"]);
        assert!(!results[0].available);
        assert!(results[1].available);
    }

    #[tokio::test(start_paused = true)]
    async fn test_groups_are_paced() {
        let provider = delayed();
        let scheduler = scheduler(provider.clone());
        let origin = tokio::time::Instant::now();

        scheduler.resolve_all(&["a", "b", "c", "d"]).await;

        let started = provider.started.lock().clone();
        assert_eq!(started.len(), 4);
        // First group starts together
        for (_, at) in &started[..3] {
            assert_eq!(*at, origin);
        }
        // Second group waits for the slowest member (300ms) plus the pause
        let (label, at) = &started[3];
        assert_eq!(label, "d");
        let waited = *at - origin;
        let expected = Duration::from_millis(300) + DEFAULT_BATCH_PACING;
        assert!(waited >= expected && waited < expected + Duration::from_millis(5), "{waited:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_pause_after_last_group() {
        let scheduler = scheduler(delayed());
        let origin = tokio::time::Instant::now();
        scheduler.resolve_all(&["c", "d", "e"]).await;
        assert!(origin.elapsed() < DEFAULT_BATCH_PACING);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let scheduler = scheduler(delayed());
        let results = scheduler.resolve_all::<&str>(&[]).await;
        assert!(results.is_empty());
    }
}
