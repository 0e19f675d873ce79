//! Availability provider implementations
//!
//! Each provider lives in its own module and only knows how to turn its
//! upstream's reply into an [`Availability`](crate::types::Availability).

pub mod domainr;
#[cfg(feature = "rdap")]
pub mod rdap;
#[cfg(feature = "whois")]
pub mod whois;
pub mod whois_xml;

pub use domainr::DomainrProvider;
#[cfg(feature = "rdap")]
pub use rdap::RdapProvider;
#[cfg(feature = "whois")]
pub use whois::WhoisProvider;
pub use whois_xml::WhoisXmlProvider;

use crate::config::EngineConfig;
use crate::domain::AvailabilityProvider;
use crate::types::ProviderName;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

const USER_AGENT: &str = concat!("domain-radar/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client for the HTTP based providers
pub fn build_http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to create HTTP client: {}. Using default.", e);
            Client::new()
        })
}

/// Seconds from a numeric `Retry-After` header
pub(crate) fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Create a provider from configuration.
///
/// Returns `None` when the provider is disabled or compiled out. Providers
/// missing a credential are still created; they report themselves as not
/// configured and the cascade skips them.
pub fn create_provider(
    name: ProviderName,
    config: &EngineConfig,
    client: &Client,
) -> Option<Arc<dyn AvailabilityProvider>> {
    let settings = config.providers.get(name);
    if !settings.enabled {
        return None;
    }

    match name {
        #[cfg(feature = "rdap")]
        ProviderName::Rdap => Some(Arc::new(RdapProvider::new(
            client.clone(),
            settings.endpoint.clone(),
            config.call_timeout,
        ))),
        #[cfg(feature = "whois")]
        ProviderName::Whois => Some(Arc::new(WhoisProvider::new(config.call_timeout))),
        ProviderName::Domainr => Some(Arc::new(DomainrProvider::new(
            client.clone(),
            settings.api_key.clone(),
            settings.endpoint.clone(),
            config.call_timeout,
        ))),
        ProviderName::WhoisXml => Some(Arc::new(WhoisXmlProvider::new(
            client.clone(),
            settings.api_key.clone(),
            settings.endpoint.clone(),
            config.call_timeout,
        ))),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

/// Every enabled provider in cascade order
pub fn default_providers(config: &EngineConfig) -> Vec<Arc<dyn AvailabilityProvider>> {
    let client = build_http_client(config.call_timeout);
    ProviderName::ALL
        .into_iter()
        .filter_map(|name| create_provider(name, config, &client))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_retry_after_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(retry_after_secs(&headers), None);

        headers.insert(RETRY_AFTER, HeaderValue::from_static("120"));
        assert_eq!(retry_after_secs(&headers), Some(120));

        headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
        assert_eq!(retry_after_secs(&headers), None);
    }

    #[cfg(all(feature = "rdap", feature = "whois"))]
    #[tokio::test]
    async fn test_default_providers_order() {
        let config = EngineConfig::default();
        let names: Vec<ProviderName> = default_providers(&config).iter().map(|p| p.name()).collect();
        assert_eq!(names, ProviderName::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_missing_keys_leave_providers_unconfigured() {
        let config = EngineConfig::default();
        let providers = default_providers(&config);
        for provider in providers {
            match provider.name() {
                ProviderName::Domainr | ProviderName::WhoisXml => assert!(!provider.is_configured()),
                _ => assert!(provider.is_configured()),
            }
        }
    }

    #[cfg(all(feature = "rdap", feature = "whois"))]
    #[tokio::test]
    async fn test_disabled_provider_not_created() {
        let mut config = EngineConfig::default();
        config.providers.whois.enabled = false;
        let names: Vec<ProviderName> = default_providers(&config).iter().map(|p| p.name()).collect();
        assert!(!names.contains(&ProviderName::Whois));
        assert_eq!(names.len(), 3);
    }

    #[cfg(not(feature = "rdap"))]
    #[tokio::test]
    async fn test_rdap_compiled_out() {
        let config = EngineConfig::default();
        let client = build_http_client(config.call_timeout);
        assert!(create_provider(ProviderName::Rdap, &config, &client).is_none());
        let names: Vec<ProviderName> = default_providers(&config).iter().map(|p| p.name()).collect();
        assert!(!names.contains(&ProviderName::Rdap));
    }
}
