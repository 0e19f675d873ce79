//! Domain availability resolution
//!
//! Normalization, the provider cascade for a single domain, and the paced
//! batch driver built on top of it.

pub mod normalizer;
pub mod providers;
pub mod resolver;
pub mod scheduler;

// Re-export main functionality
pub use normalizer::{normalize, DomainNormalizer, DEFAULT_EXTENSION};
pub use resolver::FallbackResolver;
pub use scheduler::BatchScheduler;

use crate::error::Result;
use crate::types::{Availability, DomainKey, ProviderName};
use async_trait::async_trait;

/// A single source of availability signals
#[async_trait]
pub trait AvailabilityProvider: Send + Sync {
    /// Classify `domain` as available or taken.
    ///
    /// Anything that is not a definitive answer must come back as an error:
    /// rate limiting as `RateLimit`, missing credentials as
    /// `ConfigurationMissing`, everything else as an ordinary failure.
    /// `ConfigurationMissing` releases the quota slot, so it is only for
    /// failures raised before any request leaves the process.
    async fn check(&self, domain: &DomainKey) -> Result<Availability>;

    /// Provider identity, also the quota key
    fn name(&self) -> ProviderName;

    /// False when the provider lacks credentials and must be skipped
    fn is_configured(&self) -> bool {
        true
    }
}
