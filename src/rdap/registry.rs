//! Static RDAP server table with an optional endpoint override.

/// RDAP base URL for a TLD (lowercase, without leading dot).
///
/// Returned URLs end with `/` and include any version path.
pub fn rdap_base_url(tld: &str) -> Option<&'static str> {
    match tld {
        "com" => Some("https://rdap.verisign.com/com/v1/"),
        "net" => Some("https://rdap.verisign.com/net/v1/"),
        "org" => Some("https://rdap.publicinterestregistry.org/rdap/"),
        "io" => Some("https://rdap.nic.io/"),
        "ai" => Some("https://rdap.nic.ai/"),
        "tech" => Some("https://rdap.nic.tech/"),
        "app" | "dev" => Some("https://pubapi.registry.google/rdap/"),
        "xyz" => Some("https://rdap.nic.xyz/"),
        "co" => Some("https://rdap.nic.co/"),
        "me" => Some("https://rdap.nic.me/"),
        _ => None,
    }
}

/// Resolves the RDAP query URL for a domain
#[derive(Debug, Clone, Default)]
pub struct RdapRegistry {
    override_base: Option<String>,
}

impl RdapRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send every query to `base` instead of the per-TLD server
    pub fn with_override(base: impl Into<String>) -> Self {
        let mut base = base.into();
        if !base.ends_with('/') {
            base.push('/');
        }
        Self {
            override_base: Some(base),
        }
    }

    /// Base URL for the TLD of `domain`
    pub fn base_for(&self, domain: &str) -> Option<String> {
        if let Some(base) = &self.override_base {
            return Some(base.clone());
        }
        let tld = domain.rsplit('.').next()?;
        rdap_base_url(tld).map(str::to_string)
    }

    /// Full `domain/<name>` query URL
    pub fn domain_url(&self, domain: &str) -> Option<String> {
        self.base_for(domain).map(|base| format!("{base}domain/{domain}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_known() {
        assert!(rdap_base_url("com").is_some());
        assert!(rdap_base_url("io").is_some());
        assert_eq!(rdap_base_url("app"), rdap_base_url("dev"));
        assert!(rdap_base_url("unknown").is_none());
    }

    #[test]
    fn test_domain_url() {
        let registry = RdapRegistry::new();
        assert_eq!(
            registry.domain_url("example.com").as_deref(),
            Some("https://rdap.verisign.com/com/v1/domain/example.com")
        );
        assert!(registry.domain_url("example.unknown").is_none());
    }

    #[test]
    fn test_override() {
        let registry = RdapRegistry::with_override("http://localhost:8080/rdap");
        assert_eq!(
            registry.domain_url("example.zz").as_deref(),
            Some("http://localhost:8080/rdap/domain/example.zz")
        );
    }
}
