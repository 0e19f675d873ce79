//! Engine instance owning the shared resolution state

use crate::config::EngineConfig;
use crate::domain::providers::default_providers;
use crate::domain::{AvailabilityProvider, BatchScheduler, DomainNormalizer, FallbackResolver};
use crate::error::Result;
use crate::state::{QuotaSnapshot, QuotaTracker, ResultCache};
use crate::types::{AvailabilityResult, ProviderName, ResolverStats, StatsSnapshot};
use std::sync::Arc;

/// Entry point for availability checks.
///
/// Each engine owns its quota tracker, result cache and counters; two engines
/// never share state.
pub struct AvailabilityEngine {
    config: EngineConfig,
    scheduler: BatchScheduler,
    resolver: Arc<FallbackResolver>,
    quota: Arc<QuotaTracker>,
    cache: Arc<ResultCache>,
    stats: Arc<ResolverStats>,
}

impl AvailabilityEngine {
    /// Build an engine with every provider enabled in `config`
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let providers = default_providers(&config);
        Ok(Self::assemble(config, providers))
    }

    /// Build an engine from the process environment
    pub fn from_env() -> Result<Self> {
        Self::new(EngineConfig::from_env()?)
    }

    /// Build an engine around an explicit provider list, in cascade order
    pub fn with_providers(
        config: EngineConfig,
        providers: Vec<Arc<dyn AvailabilityProvider>>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::assemble(config, providers))
    }

    fn assemble(config: EngineConfig, providers: Vec<Arc<dyn AvailabilityProvider>>) -> Self {
        let quota = Arc::new(QuotaTracker::from_config(&config.providers));
        let cache = Arc::new(ResultCache::new(config.cache_ttl));
        let stats = Arc::new(ResolverStats::new());

        tracing::debug!(
            providers = ?providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
            batch_size = config.batch_size,
            "Availability engine ready"
        );

        let resolver = Arc::new(
            FallbackResolver::new(providers, Arc::clone(&quota), Arc::clone(&cache))
                .with_stats(Arc::clone(&stats))
                .with_call_timeout(config.call_timeout),
        );
        let scheduler = BatchScheduler::new(
            Arc::clone(&resolver),
            DomainNormalizer::with_extension(&config.extension),
        )
        .with_batch_size(config.batch_size)
        .with_pacing(config.batch_pacing);

        Self {
            config,
            scheduler,
            resolver,
            quota,
            cache,
            stats,
        }
    }

    /// Resolve a batch of raw candidates, one result per input in input order
    pub async fn resolve_all<S: AsRef<str>>(&self, candidates: &[S]) -> Vec<AvailabilityResult> {
        self.scheduler.resolve_all(candidates).await
    }

    /// Resolve a single raw candidate, skipping batch pacing
    pub async fn resolve_one(&self, candidate: &str) -> AvailabilityResult {
        let key = self.normalizer().normalize(candidate);
        self.resolver.resolve(&key).await
    }

    pub fn normalizer(&self) -> &DomainNormalizer {
        self.scheduler.normalizer()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn quota_snapshot(&self, provider: ProviderName) -> Option<QuotaSnapshot> {
        self.quota.snapshot(provider)
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }
}
