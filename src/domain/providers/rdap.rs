//! Registry lookup over RDAP

use crate::domain::providers::retry_after_secs;
use crate::domain::AvailabilityProvider;
use crate::error::{DomainRadarError, Result};
use crate::rdap::RdapRegistry;
use crate::types::{Availability, DomainKey, ProviderName};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::timeout;

/// Queries the registry's RDAP server; a 404 means nobody holds the name
pub struct RdapProvider {
    client: Client,
    registry: RdapRegistry,
    timeout: Duration,
}

impl RdapProvider {
    pub fn new(client: Client, endpoint: Option<String>, timeout: Duration) -> Self {
        let registry = match endpoint {
            Some(base) => RdapRegistry::with_override(base),
            None => RdapRegistry::new(),
        };
        Self {
            client,
            registry,
            timeout,
        }
    }

    async fn lookup(&self, url: &str) -> Result<Availability> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/rdap+json")
            .send()
            .await?;

        let status = response.status().as_u16();
        let retry_after = retry_after_secs(response.headers());
        let body = if (200..300).contains(&status) {
            response.text().await?
        } else {
            String::new()
        };

        classify_rdap_response(status, &body, retry_after)
    }
}

#[async_trait]
impl AvailabilityProvider for RdapProvider {
    async fn check(&self, domain: &DomainKey) -> Result<Availability> {
        let url = self.registry.domain_url(domain.as_str()).ok_or_else(|| {
            DomainRadarError::configuration_missing(
                ProviderName::Rdap,
                format!("No RDAP server known for .{}", domain.extension()),
            )
        })?;

        timeout(self.timeout, self.lookup(&url))
            .await
            .map_err(|_| DomainRadarError::timeout("RDAP request", self.timeout))?
    }

    fn name(&self) -> ProviderName {
        ProviderName::Rdap
    }
}

#[derive(Debug, Deserialize)]
struct RdapDomain {
    #[serde(rename = "ldhName")]
    ldh_name: Option<String>,
    #[serde(default)]
    status: Vec<String>,
}

/// Map an RDAP reply to an availability signal.
///
/// 404 is the registry saying "no such object", i.e. available. Any other
/// successful reply carrying a JSON object means the name is registered.
pub fn classify_rdap_response(status: u16, body: &str, retry_after: Option<u64>) -> Result<Availability> {
    match status {
        404 => Ok(Availability::Available),
        429 => Err(DomainRadarError::rate_limit(
            ProviderName::Rdap,
            "RDAP server returned 429 Too Many Requests",
            retry_after,
        )),
        200..=299 => {
            let parsed: RdapDomain = serde_json::from_str(body).map_err(|e| {
                DomainRadarError::parse(
                    format!("Invalid RDAP response: {}", e),
                    Some(body.chars().take(512).collect()),
                )
            })?;
            tracing::trace!(ldh_name = ?parsed.ldh_name, status = ?parsed.status, "RDAP record found");
            Ok(Availability::Taken)
        }
        _ => Err(DomainRadarError::network(
            format!("RDAP request failed with status {}", status),
            Some(status),
            None,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorKind;

    #[test]
    fn test_not_found_is_available() {
        assert_eq!(classify_rdap_response(404, "", None).unwrap(), Availability::Available);
    }

    #[test]
    fn test_record_is_taken() {
        let body = r#"{"objectClassName":"domain","ldhName":"GOOGLE.COM","status":["client delete prohibited"]}"#;
        assert_eq!(classify_rdap_response(200, body, None).unwrap(), Availability::Taken);
        assert_eq!(classify_rdap_response(200, "{}", None).unwrap(), Availability::Taken);
    }

    #[test]
    fn test_rate_limit_is_distinct() {
        let err = classify_rdap_response(429, "", Some(30)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimited);
        match err {
            DomainRadarError::RateLimit { retry_after, .. } => assert_eq!(retry_after, Some(30)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_indeterminate_replies() {
        let err = classify_rdap_response(200, "<html>maintenance</html>", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProviderError);
        assert!(matches!(err, DomainRadarError::Parse { .. }));

        let err = classify_rdap_response(503, "", None).unwrap_err();
        assert_eq!(err.status_code(), Some(503));
        assert_eq!(err.kind(), ErrorKind::ProviderError);

        let err = classify_rdap_response(400, "", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProviderError);
    }

    #[tokio::test]
    async fn test_unknown_tld_is_configuration_missing() {
        let provider = RdapProvider::new(Client::new(), None, Duration::from_secs(1));
        let key = crate::domain::DomainNormalizer::with_extension("zz").normalize("example");
        let err = provider.check(&key).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigurationMissing);
        assert!(provider.is_configured());
    }
}
