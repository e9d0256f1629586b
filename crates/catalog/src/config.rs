use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::resilience::{CircuitBreakerConfig, RateLimitConfig, RetryConfig};

/// Connection settings for the remote film catalog.
///
/// Credentials are optional here so the struct can be embedded in a YAML file
/// that leaves secrets to the environment; [`CatalogConfig::validate`] checks
/// that at least one is present before a client is built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogConfig {
    #[serde(default = "CatalogConfig::default_base_url")]
    pub base_url: String,
    /// v3 API key, sent as the `api_key` query parameter.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// v4 read access token, sent as `Authorization: Bearer`.
    #[serde(default, skip_serializing)]
    pub bearer_token: Option<String>,
    /// Response language (e.g. `en-US`). Catalog default when unset.
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub include_adult: bool,
    #[serde(
        default = "CatalogConfig::default_request_timeout",
        with = "crate::serde_millis"
    )]
    pub request_timeout: Duration,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub circuit_breaker: CircuitBreakerConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Toggle breaker, limiter and retry as a group.
    #[serde(default = "CatalogConfig::default_enable_resilience")]
    pub enable_resilience: bool,
}

impl CatalogConfig {
    pub(crate) fn default_base_url() -> String {
        "https://api.themoviedb.org/3".to_string()
    }

    pub(crate) fn default_request_timeout() -> Duration {
        Duration::from_secs(10)
    }

    pub(crate) fn default_enable_resilience() -> bool {
        true
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn has_credentials(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.api_key) || present(&self.bearer_token)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        let base = self.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(CatalogError::InvalidConfig(format!(
                "base_url must be an http(s) URL, got '{base}'"
            )));
        }
        if !self.has_credentials() {
            return Err(CatalogError::InvalidConfig(
                "api_key or bearer_token is required".into(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(CatalogError::InvalidConfig(
                "request_timeout must be greater than zero".into(),
            ));
        }
        if self.enable_resilience {
            if self.circuit_breaker.failure_threshold == 0 {
                return Err(CatalogError::InvalidConfig(
                    "circuit_breaker.failure_threshold must be greater than zero".into(),
                ));
            }
            if !(self.rate_limit.requests_per_second > 0.0) || self.rate_limit.burst_size == 0 {
                return Err(CatalogError::InvalidConfig(
                    "rate_limit needs a positive rate and burst size".into(),
                ));
            }
        }
        Ok(())
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            api_key: None,
            bearer_token: None,
            language: None,
            include_adult: false,
            request_timeout: Self::default_request_timeout(),
            retry: RetryConfig::default(),
            circuit_breaker: CircuitBreakerConfig::default(),
            rate_limit: RateLimitConfig::default(),
            enable_resilience: Self::default_enable_resilience(),
        }
    }
}
