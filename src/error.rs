//! Error handling for domain-radar

use crate::types::{ErrorKind, ProviderName};
use std::time::Duration;
use thiserror::Error;

/// Main error type for domain-radar
#[derive(Error, Debug, Clone)]
pub enum DomainRadarError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Provider {provider} is not configured: {message}")]
    ConfigurationMissing {
        provider: ProviderName,
        message: String,
    },

    #[error("Network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
        url: Option<String>,
    },

    #[error("Rate limited by {provider}: {message}")]
    RateLimit {
        provider: ProviderName,
        message: String,
        retry_after: Option<u64>,
    },

    #[error("Timeout error: {operation} timed out after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        content: Option<String>,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainRadarError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an error for a provider that lacks credentials or an endpoint
    pub fn configuration_missing(provider: ProviderName, message: impl Into<String>) -> Self {
        Self::ConfigurationMissing {
            provider,
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(
        message: impl Into<String>,
        status_code: Option<u16>,
        url: Option<String>,
    ) -> Self {
        Self::Network {
            message: message.into(),
            status_code,
            url,
        }
    }

    /// Create a rate limit error
    pub fn rate_limit(
        provider: ProviderName,
        message: impl Into<String>,
        retry_after: Option<u64>,
    ) -> Self {
        Self::RateLimit {
            provider,
            message: message.into(),
            retry_after,
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, timeout: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms: timeout.as_millis() as u64,
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>, content: Option<String>) -> Self {
        Self::Parse {
            message: message.into(),
            content,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Classify this error for the fallback cascade.
    ///
    /// Rate limiting and missing configuration get their own kinds; everything
    /// else is an ordinary provider failure that counts against the quota.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RateLimit { .. } => ErrorKind::RateLimited,
            Self::ConfigurationMissing { .. } => ErrorKind::ConfigurationMissing,
            _ => ErrorKind::ProviderError,
        }
    }

    /// Whether the upstream rejected the call because of its own rate limit
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimit { .. })
    }

    /// HTTP status code attached to the error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Network { status_code, .. } => *status_code,
            Self::RateLimit { .. } => Some(429),
            _ => None,
        }
    }
}

/// Convert from common error types
impl From<reqwest::Error> for DomainRadarError {
    fn from(err: reqwest::Error) -> Self {
        let status_code = err.status().map(|s| s.as_u16());
        let url = err.url().map(|u| u.to_string());

        if err.is_timeout() {
            Self::Timeout {
                operation: "HTTP request".to_string(),
                timeout_ms: 0,
            }
        } else if err.is_connect() {
            Self::network("Connection failed", status_code, url)
        } else if err.is_decode() {
            Self::parse(err.to_string(), None)
        } else {
            Self::network(err.to_string(), status_code, url)
        }
    }
}

impl From<serde_json::Error> for DomainRadarError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string(), None)
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, DomainRadarError>;

/// Helper macros for common error patterns
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::DomainRadarError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::DomainRadarError::config(format!($fmt, $($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let err = DomainRadarError::rate_limit(ProviderName::Domainr, "429", Some(30));
        assert_eq!(err.kind(), ErrorKind::RateLimited);
        assert!(err.is_rate_limited());
        assert_eq!(err.status_code(), Some(429));

        let err = DomainRadarError::configuration_missing(ProviderName::Domainr, "no key");
        assert_eq!(err.kind(), ErrorKind::ConfigurationMissing);

        let err = DomainRadarError::network("boom", Some(503), None);
        assert_eq!(err.kind(), ErrorKind::ProviderError);
        assert_eq!(err.status_code(), Some(503));

        let err = DomainRadarError::timeout("RDAP request", Duration::from_secs(5));
        assert_eq!(err.kind(), ErrorKind::ProviderError);
        assert!(err.to_string().contains("5000ms"));
    }

    #[test]
    fn test_reqwest_and_json_conversions() {
        let err: DomainRadarError = reqwest::Client::new()
            .get("http://[::1")
            .build()
            .unwrap_err()
            .into();
        assert!(matches!(err, DomainRadarError::Network { .. }));
        assert_eq!(err.kind(), ErrorKind::ProviderError);

        let err: DomainRadarError = serde_json::from_str::<Vec<String>>("{").unwrap_err().into();
        assert!(matches!(err, DomainRadarError::Parse { .. }));
    }

    #[test]
    fn test_config_macro() {
        let err = config_error!("bad value for {}", "DOMAIN_RADAR_BATCH_SIZE");
        assert!(err.to_string().contains("DOMAIN_RADAR_BATCH_SIZE"));
    }
}
