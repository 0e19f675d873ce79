//! Core types and structures for domain-radar

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Availability lookup provider.
///
/// The declaration order is the default cascade order: cheapest and most
/// reliable signal first, scarcest quota last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderName {
    /// Registry RDAP lookup
    Rdap,
    /// WHOIS protocol lookup over TCP/43
    Whois,
    /// Domainr commercial status API
    Domainr,
    /// WhoisXML commercial WHOIS-record API
    WhoisXml,
}

impl ProviderName {
    /// All providers in default cascade order
    pub const ALL: [ProviderName; 4] = [
        ProviderName::Rdap,
        ProviderName::Whois,
        ProviderName::Domainr,
        ProviderName::WhoisXml,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderName::Rdap => "rdap",
            ProviderName::Whois => "whois",
            ProviderName::Domainr => "domainr",
            ProviderName::WhoisXml => "whoisxml",
        }
    }
}

impl std::fmt::Display for ProviderName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error classification carried by results and used by the cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Upstream refused the call; try the next provider, no quota charged
    RateLimited,
    /// Parse, network or timeout failure; quota charged, try the next provider
    ProviderError,
    /// Every provider was skipped or failed for this domain
    AllProvidersFailed,
    /// Provider lacks credentials and is permanently skipped
    ConfigurationMissing,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::RateLimited => write!(f, "rate_limited"),
            ErrorKind::ProviderError => write!(f, "provider_error"),
            ErrorKind::AllProvidersFailed => write!(f, "all_providers_failed"),
            ErrorKind::ConfigurationMissing => write!(f, "configuration_missing"),
        }
    }
}

/// Definitive signal returned by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Available,
    Taken,
}

impl Availability {
    pub fn is_available(self) -> bool {
        matches!(self, Availability::Available)
    }
}

/// A normalized, fully-qualified domain used as the cache and quota key.
///
/// Only [`crate::domain::DomainNormalizer`] creates these, so the value is
/// always lowercase `[a-z0-9-]*` followed by a single extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DomainKey(String);

impl DomainKey {
    pub(crate) fn from_normalized(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name part in front of the extension
    pub fn label(&self) -> &str {
        self.0.split('.').next().unwrap_or_default()
    }

    /// Extension without the leading dot
    pub fn extension(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or_default()
    }

    /// False for keys built from empty or fully invalid input (e.g. `.com`)
    pub fn has_label(&self) -> bool {
        !self.label().is_empty()
    }
}

impl std::fmt::Display for DomainKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DomainKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Outcome of resolving one domain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilityResult {
    pub domain: DomainKey,
    pub available: bool,
    /// Provider that produced the answer; `None` for synthetic failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl AvailabilityResult {
    /// Definitive answer from a provider
    pub fn resolved(domain: DomainKey, availability: Availability, provider: ProviderName) -> Self {
        Self {
            domain,
            available: availability.is_available(),
            provider: Some(provider),
            error_kind: None,
            error: None,
            checked_at: Utc::now(),
        }
    }

    /// Synthetic result for an exhausted cascade
    pub fn all_providers_failed(domain: DomainKey) -> Self {
        Self {
            domain,
            available: false,
            provider: None,
            error_kind: Some(ErrorKind::AllProvidersFailed),
            error: Some("All availability checking services failed".to_string()),
            checked_at: Utc::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error_kind.is_some()
    }
}

/// Resolver counters, updated lock-free from concurrent tasks
#[derive(Debug, Default)]
pub struct ResolverStats {
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    provider_calls: AtomicU64,
    provider_errors: AtomicU64,
    rate_limited: AtomicU64,
    quota_skips: AtomicU64,
    exhausted: AtomicU64,
}

impl ResolverStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_cache_hits(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_cache_misses(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_provider_calls(&self) {
        self.provider_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_provider_errors(&self) {
        self.provider_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rate_limited(&self) {
        self.rate_limited.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_quota_skips(&self) {
        self.quota_skips.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_exhausted(&self) {
        self.exhausted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            provider_calls: self.provider_calls.load(Ordering::Relaxed),
            provider_errors: self.provider_errors.load(Ordering::Relaxed),
            rate_limited: self.rate_limited.load(Ordering::Relaxed),
            quota_skips: self.quota_skips.load(Ordering::Relaxed),
            exhausted: self.exhausted.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`ResolverStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub provider_calls: u64,
    pub provider_errors: u64,
    pub rate_limited: u64,
    pub quota_skips: u64,
    pub exhausted: u64,
}

impl StatsSnapshot {
    /// Share of lookups answered from the cache, 0.0 when nothing was looked up
    pub fn cache_hit_ratio(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}
