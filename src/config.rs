//! Engine configuration
//!
//! Defaults mirror the quotas the public endpoints tolerate in practice. Every
//! value can be overridden from the environment (a `.env` file is honoured).

use crate::error::{DomainRadarError, Result};
use crate::types::ProviderName;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

const HOUR: Duration = Duration::from_secs(60 * 60);
const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Settings for a single lookup provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    pub enabled: bool,
    /// Override for the provider's base URL
    pub endpoint: Option<String>,
    /// Credential for providers that need one
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Calls allowed per window
    pub limit: u32,
    pub window: Duration,
}

impl ProviderSettings {
    fn new(limit: u32, window: Duration) -> Self {
        Self {
            enabled: true,
            endpoint: None,
            api_key: None,
            limit,
            window,
        }
    }

    /// Default quota for a provider
    pub fn default_for(provider: ProviderName) -> Self {
        match provider {
            ProviderName::Rdap => Self::new(1000, HOUR),
            ProviderName::Whois => Self::new(500, DAY),
            ProviderName::Domainr => Self::new(100, DAY),
            ProviderName::WhoisXml => Self::new(100, DAY),
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }
}

/// Per-provider settings, one field per provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    pub rdap: ProviderSettings,
    pub whois: ProviderSettings,
    pub domainr: ProviderSettings,
    pub whois_xml: ProviderSettings,
}

impl ProvidersConfig {
    pub fn get(&self, provider: ProviderName) -> &ProviderSettings {
        match provider {
            ProviderName::Rdap => &self.rdap,
            ProviderName::Whois => &self.whois,
            ProviderName::Domainr => &self.domainr,
            ProviderName::WhoisXml => &self.whois_xml,
        }
    }

    pub fn get_mut(&mut self, provider: ProviderName) -> &mut ProviderSettings {
        match provider {
            ProviderName::Rdap => &mut self.rdap,
            ProviderName::Whois => &mut self.whois,
            ProviderName::Domainr => &mut self.domainr,
            ProviderName::WhoisXml => &mut self.whois_xml,
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            rdap: ProviderSettings::default_for(ProviderName::Rdap),
            whois: ProviderSettings::default_for(ProviderName::Whois),
            domainr: ProviderSettings::default_for(ProviderName::Domainr),
            whois_xml: ProviderSettings::default_for(ProviderName::WhoisXml),
        }
    }
}

/// Configuration for the availability engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Canonical extension appended to every candidate, without the dot
    pub extension: String,
    /// Domains resolved concurrently per group
    pub batch_size: usize,
    /// Pause between groups
    pub batch_pacing: Duration,
    /// How long a result stays fresh in the cache
    pub cache_ttl: Duration,
    /// Upper bound for a single provider call
    pub call_timeout: Duration,
    pub providers: ProvidersConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            extension: "com".to_string(),
            batch_size: 3,
            batch_pacing: Duration::from_secs(2),
            cache_ttl: Duration::from_secs(5 * 60),
            call_timeout: Duration::from_secs(5),
            providers: ProvidersConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Build a configuration from the process environment.
    ///
    /// Loads `.env` first if present. Missing API keys are not an error: the
    /// provider is simply skipped by the cascade.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(ext) = get("DOMAIN_RADAR_EXTENSION") {
            config.extension = ext.trim().trim_start_matches('.').to_lowercase();
        }
        if let Some(size) = get("DOMAIN_RADAR_BATCH_SIZE") {
            config.batch_size = parse_value("DOMAIN_RADAR_BATCH_SIZE", &size)?;
        }
        if let Some(ms) = get("DOMAIN_RADAR_PACING_MS") {
            config.batch_pacing = Duration::from_millis(parse_value("DOMAIN_RADAR_PACING_MS", &ms)?);
        }
        if let Some(secs) = get("DOMAIN_RADAR_CACHE_TTL_SECS") {
            config.cache_ttl = Duration::from_secs(parse_value("DOMAIN_RADAR_CACHE_TTL_SECS", &secs)?);
        }
        if let Some(secs) = get("DOMAIN_RADAR_TIMEOUT_SECS") {
            config.call_timeout = Duration::from_secs(parse_value("DOMAIN_RADAR_TIMEOUT_SECS", &secs)?);
        }

        if let Some(endpoint) = get("RDAP_ENDPOINT") {
            config.providers.rdap.endpoint = Some(endpoint);
        }
        config.providers.domainr.api_key = get("DOMAINR_API_KEY");
        config.providers.whois_xml.api_key = get("WHOIS_API_KEY");

        for provider in ProviderName::ALL {
            let key = format!("{}_QUOTA_LIMIT", provider.as_str().to_uppercase());
            if let Some(limit) = get(key.as_str()) {
                config.providers.get_mut(provider).limit = parse_value(&key, &limit)?;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(DomainRadarError::config("batch_size must be at least 1"));
        }
        if self.extension.is_empty()
            || !self.extension.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(crate::config_error!(
                "Invalid extension '{}': expected lowercase letters or digits",
                self.extension
            ));
        }
        if self.call_timeout.is_zero() {
            return Err(DomainRadarError::config("call_timeout must be greater than zero"));
        }
        Ok(())
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_batch_pacing(mut self, pacing: Duration) -> Self {
        self.batch_pacing = pacing;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_lowercase();
        self
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| crate::config_error!("Invalid value for {}: '{}'", key, raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.extension, "com");
        assert_eq!(config.batch_size, 3);
        assert_eq!(config.batch_pacing, Duration::from_secs(2));
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert!(config.providers.rdap.limit > config.providers.whois.limit);
        assert!(config.providers.whois.limit > config.providers.domainr.limit);
        assert!(config.providers.rdap.window < config.providers.domainr.window);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = EngineConfig::from_lookup(lookup_from(&[
            ("DOMAIN_RADAR_EXTENSION", ".IO"),
            ("DOMAIN_RADAR_BATCH_SIZE", "5"),
            ("DOMAIN_RADAR_PACING_MS", "250"),
            ("DOMAINR_API_KEY", "secret"),
            ("WHOIS_QUOTA_LIMIT", "7"),
        ]))
        .unwrap();

        assert_eq!(config.extension, "io");
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.batch_pacing, Duration::from_millis(250));
        assert_eq!(config.providers.domainr.api_key.as_deref(), Some("secret"));
        assert!(config.providers.whois_xml.api_key.is_none());
        assert_eq!(config.providers.whois.limit, 7);
    }

    #[test]
    fn test_provider_settings_builders() {
        let settings = ProviderSettings::default_for(ProviderName::Domainr)
            .with_limit(5)
            .with_window(HOUR)
            .with_api_key("key")
            .with_endpoint("http://localhost:9000");
        assert_eq!(settings.limit, 5);
        assert_eq!(settings.window, HOUR);
        assert_eq!(settings.api_key.as_deref(), Some("key"));
        assert_eq!(settings.endpoint.as_deref(), Some("http://localhost:9000"));

        // Keys never leak into serialized config
        let json = serde_json::to_string(&settings).unwrap();
        assert!(!json.contains("key\""));
        assert!(!json.contains("api_key"));
    }

    #[test]
    fn test_blank_key_is_absent() {
        let config = EngineConfig::from_lookup(lookup_from(&[("DOMAINR_API_KEY", "  ")])).unwrap();
        assert!(config.providers.domainr.api_key.is_none());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = EngineConfig::from_lookup(lookup_from(&[("DOMAIN_RADAR_BATCH_SIZE", "three")]))
            .unwrap_err();
        assert!(err.to_string().contains("DOMAIN_RADAR_BATCH_SIZE"));

        assert!(EngineConfig::from_lookup(lookup_from(&[("DOMAIN_RADAR_BATCH_SIZE", "0")])).is_err());
        assert!(EngineConfig::default().with_extension("c.om").validate().is_err());
    }
}
