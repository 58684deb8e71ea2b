//! Configuration types for the Saucier proxy

use crate::Result;
use serde::{Deserialize, Serialize};

/// Main proxy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Base URL of the upstream recipe-search API
    #[serde(default = "default_upstream_base_url")]
    pub upstream_base_url: String,
    /// Redis connection URL for the result cache
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    /// Time-to-live for cached search results, in seconds
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,
    /// Per-call timeout for upstream requests, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Host address to bind the HTTP server to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind the HTTP server to
    #[serde(default = "default_port")]
    pub port: u16,
    /// Whether to add a permissive CORS layer
    #[serde(default = "default_true")]
    pub cors_enabled: bool,
    /// Maximum accepted request body size in bytes
    #[serde(default = "default_max_request_size")]
    pub max_request_size: usize,
}

fn default_upstream_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_request_timeout() -> u64 {
    30
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8001
}

fn default_true() -> bool {
    true
}

fn default_max_request_size() -> usize {
    1024 * 1024
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            upstream_base_url: default_upstream_base_url(),
            redis_url: default_redis_url(),
            cache_ttl_seconds: default_cache_ttl(),
            request_timeout_seconds: default_request_timeout(),
            host: default_host(),
            port: default_port(),
            cors_enabled: true,
            max_request_size: default_max_request_size(),
        }
    }
}

impl ProxyConfig {
    /// Load configuration from `SAUCIER_*` environment variables layered
    /// over the defaults
    ///
    /// For example `SAUCIER_UPSTREAM_BASE_URL` overrides
    /// `upstream_base_url`.
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&ProxyConfig::default())?)
            .add_source(config::Environment::with_prefix("SAUCIER"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Validate the configuration values
    pub fn validate(&self) -> Result<()> {
        if self.upstream_base_url.trim().is_empty() {
            return Err(crate::SaucierError::validation(
                "upstream_base_url must not be empty",
            ));
        }
        if self.cache_ttl_seconds == 0 {
            return Err(crate::SaucierError::validation(
                "cache_ttl_seconds must be greater than zero",
            ));
        }
        if self.request_timeout_seconds == 0 {
            return Err(crate::SaucierError::validation(
                "request_timeout_seconds must be greater than zero",
            ));
        }
        Ok(())
    }
}
