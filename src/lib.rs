//! Domain Radar - domain availability resolution
//!
//! Checks batches of candidate names against RDAP, WHOIS and commercial
//! status APIs with per-provider quotas, a short-lived result cache and paced
//! concurrent batches.

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod llm;
#[cfg(feature = "rdap")]
pub mod rdap;
pub mod state;
pub mod types;

// Re-export commonly used types
pub use config::{EngineConfig, ProviderSettings, ProvidersConfig};
pub use error::{DomainRadarError, Result};
pub use types::{
    Availability, AvailabilityResult, DomainKey, ErrorKind, ProviderName, ResolverStats,
    StatsSnapshot,
};

// Re-export main functionality
pub use domain::{AvailabilityProvider, BatchScheduler, DomainNormalizer, FallbackResolver};
pub use engine::AvailabilityEngine;
pub use llm::{CandidateGenerator, GenerationRequest};
pub use state::{QuotaTracker, ResultCache};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
