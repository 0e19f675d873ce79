//! Commercial status lookup through the Domainr API (RapidAPI)

use crate::domain::providers::retry_after_secs;
use crate::domain::AvailabilityProvider;
use crate::error::{DomainRadarError, Result};
use crate::types::{Availability, DomainKey, ProviderName};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::timeout;

const DEFAULT_ENDPOINT: &str = "https://domainr.p.rapidapi.com";
const RAPIDAPI_HOST: &str = "domainr.p.rapidapi.com";

pub struct DomainrProvider {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    timeout: Duration,
}

impl DomainrProvider {
    pub fn new(
        client: Client,
        api_key: Option<String>,
        endpoint: Option<String>,
        timeout: Duration,
    ) -> Self {
        let endpoint = endpoint
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();
        Self {
            client,
            api_key,
            endpoint,
            timeout,
        }
    }

    async fn lookup(&self, api_key: &str, domain: &str) -> Result<Availability> {
        let url = format!("{}/v2/status", self.endpoint);
        let response = self
            .client
            .get(&url)
            .query(&[("domain", domain)])
            .header("X-RapidAPI-Key", api_key)
            .header("X-RapidAPI-Host", RAPIDAPI_HOST)
            .send()
            .await?;

        let status = response.status().as_u16();
        let retry_after = retry_after_secs(response.headers());
        let body = response.text().await?;

        classify_domainr_response(status, &body, retry_after)
    }
}

#[async_trait]
impl AvailabilityProvider for DomainrProvider {
    async fn check(&self, domain: &DomainKey) -> Result<Availability> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            DomainRadarError::configuration_missing(ProviderName::Domainr, "DOMAINR_API_KEY not configured")
        })?;

        timeout(self.timeout, self.lookup(api_key, domain.as_str()))
            .await
            .map_err(|_| DomainRadarError::timeout("Domainr request", self.timeout))?
    }

    fn name(&self) -> ProviderName {
        ProviderName::Domainr
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[derive(Debug, Deserialize)]
struct DomainrResponse {
    status: Option<Vec<DomainrStatus>>,
}

#[derive(Debug, Deserialize)]
struct DomainrStatus {
    #[serde(default)]
    status: String,
}

/// Map a Domainr `/v2/status` reply to an availability signal.
///
/// Domainr reports space separated status tags; `inactive` or `unknown`
/// anywhere in the first entry means the name can be registered.
pub fn classify_domainr_response(status: u16, body: &str, retry_after: Option<u64>) -> Result<Availability> {
    if status == 429 {
        return Err(DomainRadarError::rate_limit(
            ProviderName::Domainr,
            "Domainr quota exhausted (429)",
            retry_after,
        ));
    }
    if !(200..300).contains(&status) {
        return Err(DomainRadarError::network(
            format!("Domainr request failed with status {}", status),
            Some(status),
            None,
        ));
    }

    let parsed: DomainrResponse = serde_json::from_str(body)?;
    let entry = parsed
        .status
        .as_deref()
        .and_then(<[DomainrStatus]>::first)
        .ok_or_else(|| {
            DomainRadarError::parse("Invalid response from Domainr API", Some(body.to_string()))
        })?;

    if entry.status.contains("inactive") || entry.status.contains("unknown") {
        Ok(Availability::Available)
    } else {
        Ok(Availability::Taken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::normalize;
    use crate::types::ErrorKind;

    #[test]
    fn test_status_tags() {
        let inactive = r#"{"status":[{"domain":"xk3j9q7z1m.com","zone":"com","status":"undelegated inactive","summary":"inactive"}]}"#;
        assert_eq!(classify_domainr_response(200, inactive, None).unwrap(), Availability::Available);

        let unknown = r#"{"status":[{"domain":"odd.com","status":"unknown"}]}"#;
        assert_eq!(classify_domainr_response(200, unknown, None).unwrap(), Availability::Available);

        let active = r#"{"status":[{"domain":"google.com","zone":"com","status":"active","summary":"active"}]}"#;
        assert_eq!(classify_domainr_response(200, active, None).unwrap(), Availability::Taken);
    }

    #[test]
    fn test_malformed_replies() {
        for body in [r#"{"status":[]}"#, r#"{"errors":[]}"#, "not json"] {
            let err = classify_domainr_response(200, body, None).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ProviderError, "{body}");
        }
    }

    #[test]
    fn test_rate_limited() {
        let err = classify_domainr_response(429, "", Some(60)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimited);

        let err = classify_domainr_response(500, "", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProviderError);
    }

    #[tokio::test]
    async fn test_missing_key() {
        let provider = DomainrProvider::new(Client::new(), None, None, Duration::from_secs(1));
        assert!(!provider.is_configured());
        let err = provider.check(&normalize("anything")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigurationMissing);
    }
}
