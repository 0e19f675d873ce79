//! WHOIS record lookup through the WhoisXML API

use crate::domain::providers::retry_after_secs;
use crate::domain::AvailabilityProvider;
use crate::error::{DomainRadarError, Result};
use crate::types::{Availability, DomainKey, ProviderName};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::timeout;

const DEFAULT_ENDPOINT: &str = "https://www.whoisxmlapi.com/whoisserver/WhoisService";

pub struct WhoisXmlProvider {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    timeout: Duration,
}

impl WhoisXmlProvider {
    pub fn new(
        client: Client,
        api_key: Option<String>,
        endpoint: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            api_key,
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            timeout,
        }
    }

    async fn lookup(&self, api_key: &str, domain: &str) -> Result<Availability> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("apiKey", api_key),
                ("domainName", domain),
                ("outputFormat", "JSON"),
            ])
            .send()
            .await?;

        let status = response.status().as_u16();
        let retry_after = retry_after_secs(response.headers());
        let body = response.text().await?;

        classify_whois_xml_response(status, &body, retry_after)
    }
}

#[async_trait]
impl AvailabilityProvider for WhoisXmlProvider {
    async fn check(&self, domain: &DomainKey) -> Result<Availability> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            DomainRadarError::configuration_missing(ProviderName::WhoisXml, "WHOIS_API_KEY not configured")
        })?;

        timeout(self.timeout, self.lookup(api_key, domain.as_str()))
            .await
            .map_err(|_| DomainRadarError::timeout("WhoisXML request", self.timeout))?
    }

    fn name(&self) -> ProviderName {
        ProviderName::WhoisXml
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[derive(Debug, Deserialize)]
struct WhoisXmlResponse {
    #[serde(rename = "WhoisRecord")]
    whois_record: Option<WhoisRecord>,
    #[serde(rename = "ErrorMessage")]
    error_message: Option<WhoisXmlError>,
}

#[derive(Debug, Deserialize)]
struct WhoisRecord {
    #[serde(rename = "registryData")]
    registry_data: Option<RegistryData>,
}

#[derive(Debug, Deserialize)]
struct RegistryData {
    #[serde(rename = "createdDate")]
    created_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WhoisXmlError {
    #[serde(rename = "errorCode", default)]
    error_code: String,
    #[serde(default)]
    msg: String,
}

/// Map a WhoisXML reply to an availability signal.
///
/// A registry creation date means the name is registered; a record without
/// one is treated as available.
pub fn classify_whois_xml_response(status: u16, body: &str, retry_after: Option<u64>) -> Result<Availability> {
    if status == 429 {
        return Err(DomainRadarError::rate_limit(
            ProviderName::WhoisXml,
            "WhoisXML API rate limit reached (429)",
            retry_after,
        ));
    }
    if !(200..300).contains(&status) {
        return Err(DomainRadarError::network(
            format!("WhoisXML request failed with status {}", status),
            Some(status),
            None,
        ));
    }

    let parsed: WhoisXmlResponse = serde_json::from_str(body)?;
    if let Some(error) = parsed.error_message {
        return Err(DomainRadarError::network(
            format!("WhoisXML error {}: {}", error.error_code, error.msg),
            Some(status),
            None,
        ));
    }

    let created = parsed
        .whois_record
        .and_then(|record| record.registry_data)
        .and_then(|data| data.created_date)
        .filter(|date| !date.trim().is_empty());

    match created {
        Some(_) => Ok(Availability::Taken),
        None => Ok(Availability::Available),
    }
}
