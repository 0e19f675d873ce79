//! Protocol lookup over WHOIS (TCP/43)

use crate::domain::AvailabilityProvider;
use crate::error::{DomainRadarError, Result};
use crate::types::{Availability, DomainKey, ProviderName};
use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

const IANA_WHOIS: &str = "whois.iana.org";

const RATE_LIMIT_PATTERNS: &[&str] = &[
    "limit exceeded",
    "quota exceeded",
    "too many requests",
    "exceeded the maximum allowable number",
    "please try again later",
];

const AVAILABLE_PATTERNS: &[&str] = &[
    "no match",
    "not found",
    "no entries found",
    "no data found",
    "status: available",
    "status: free",
];

const DOMAIN_NAME_FIELDS: &[&str] = &["domain name:", "domain:"];
const REGISTRAR_FIELDS: &[&str] = &["registrar:", "registrar name:", "sponsoring registrar:"];

/// Queries the TLD's WHOIS server directly and reads availability from text
pub struct WhoisProvider {
    timeout: Duration,
    port: u16,
    server_override: Option<String>,
}

impl WhoisProvider {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            port: 43,
            server_override: None,
        }
    }

    /// Send every query to `server:port`, skipping server discovery
    pub fn with_server(mut self, server: impl Into<String>, port: u16) -> Self {
        self.server_override = Some(server.into());
        self.port = port;
        self
    }

    async fn lookup(&self, domain: &str, tld: &str) -> Result<String> {
        if let Some(server) = &self.server_override {
            return self.query_whois(server, domain).await;
        }

        match whois_server_for_tld(tld) {
            Some(server) => self.query_whois(server, domain).await,
            None => {
                // Unknown TLD: ask IANA for the authoritative server first
                let iana = self.query_whois(IANA_WHOIS, tld).await?;
                let server = referral_server(&iana, tld)?;
                self.query_whois(&server, domain).await
            }
        }
    }

    async fn query_whois(&self, server: &str, query: &str) -> Result<String> {
        let addr = format!("{}:{}", server, self.port);
        let mut stream = TcpStream::connect(&addr).await.map_err(|e| {
            DomainRadarError::network(format!("WHOIS connect failed: {}", e), None, Some(addr.clone()))
        })?;

        stream
            .write_all(format!("{}\r\n", query).as_bytes())
            .await
            .map_err(|e| {
                DomainRadarError::network(format!("WHOIS write failed: {}", e), None, Some(addr.clone()))
            })?;

        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.map_err(|e| {
            DomainRadarError::network(format!("WHOIS read failed: {}", e), None, Some(addr))
        })?;

        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[async_trait]
impl AvailabilityProvider for WhoisProvider {
    async fn check(&self, domain: &DomainKey) -> Result<Availability> {
        let raw = timeout(self.timeout, self.lookup(domain.as_str(), domain.extension()))
            .await
            .map_err(|_| DomainRadarError::timeout("WHOIS lookup", self.timeout))??;

        classify_whois_response(&raw)
    }

    fn name(&self) -> ProviderName {
        ProviderName::Whois
    }
}

/// Well-known WHOIS servers; everything else goes through IANA
fn whois_server_for_tld(tld: &str) -> Option<&'static str> {
    match tld {
        "com" | "net" => Some("whois.verisign-grs.com"),
        "org" => Some("whois.pir.org"),
        "io" => Some("whois.nic.io"),
        "ai" => Some("whois.nic.ai"),
        "co" => Some("whois.nic.co"),
        "me" => Some("whois.nic.me"),
        "xyz" => Some("whois.nic.xyz"),
        "app" | "dev" => Some("whois.nic.google"),
        _ => None,
    }
}

/// Server named by an IANA reply. By now a query has gone out, so a reply
/// without a referral is a provider error and the attempt stays counted.
fn referral_server(iana: &str, tld: &str) -> Result<String> {
    parse_iana_server(iana).ok_or_else(|| {
        DomainRadarError::parse(
            format!("No WHOIS server found for TLD: {}", tld),
            Some(iana.chars().take(512).collect()),
        )
    })
}

/// `whois:` or `refer:` line of an IANA reply
fn parse_iana_server(iana: &str) -> Option<String> {
    let field = |name: &str| {
        iana.lines()
            .map(str::trim)
            .find_map(|line| {
                let (key, value) = line.split_once(':')?;
                key.trim().eq_ignore_ascii_case(name).then(|| value.trim().to_string())
            })
            .filter(|s| !s.is_empty())
    };
    field("whois").or_else(|| field("refer"))
}

fn has_field(lower: &str, fields: &[&str]) -> bool {
    lower
        .lines()
        .map(str::trim_start)
        .any(|line| fields.iter().any(|field| line.starts_with(field)))
}

/// Read availability from a raw WHOIS reply.
///
/// The heuristic is deliberately loose: a reply with no registrar or no
/// domain-name field counts as available, like an explicit "no match".
pub fn classify_whois_response(raw: &str) -> Result<Availability> {
    let lower = raw.to_lowercase();

    if lower.trim().is_empty() {
        return Err(DomainRadarError::parse("Empty WHOIS response", None));
    }

    if RATE_LIMIT_PATTERNS.iter().any(|p| lower.contains(p)) {
        return Err(DomainRadarError::rate_limit(
            ProviderName::Whois,
            "WHOIS server refused the query",
            None,
        ));
    }

    if AVAILABLE_PATTERNS.iter().any(|p| lower.contains(p)) {
        return Ok(Availability::Available);
    }

    if !has_field(&lower, DOMAIN_NAME_FIELDS) || !has_field(&lower, REGISTRAR_FIELDS) {
        return Ok(Availability::Available);
    }

    Ok(Availability::Taken)
}
