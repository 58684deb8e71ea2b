//! Upstream recipe-search API client
//!
//! One `reqwest::Client` is built at construction and reused for every
//! call, so connections are pooled across concurrent requests. There are
//! no retries at this layer; a failed call fails the single operation it
//! backs.

use saucier_core::{Result, SaucierError};
use serde_json::Value;
use std::time::Duration;

/// Upstream client configuration
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the upstream recipe-search API
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    config: UpstreamConfig,
    client: reqwest::Client,
}

impl Default for UpstreamClient {
    fn default() -> Self {
        Self::new(UpstreamConfig::default())
    }
}

impl UpstreamClient {
    /// Create a new upstream client
    pub fn new(config: UpstreamConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap();

        Self { config, client }
    }

    /// Base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Check if the upstream API is reachable
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/search/stats", self.config.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                tracing::warn!("Upstream health check failed: {}", e);
                Ok(false)
            }
        }
    }

    /// POST a JSON payload to an upstream path and return the JSON body
    pub async fn post_json(&self, path: &str, payload: &Value) -> Result<Value> {
        let url = format!("{}{}", self.config.base_url, path);

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                SaucierError::upstream_unreachable(format!("Request to {} failed: {}", path, e))
            })?;

        Self::json_body(path, response).await
    }

    /// GET an upstream path and return the JSON body
    pub async fn get_json(&self, path: &str) -> Result<Value> {
        let url = format!("{}{}", self.config.base_url, path);

        let response = self.client.get(&url).send().await.map_err(|e| {
            SaucierError::upstream_unreachable(format!("Request to {} failed: {}", path, e))
        })?;

        Self::json_body(path, response).await
    }

    async fn json_body(path: &str, response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SaucierError::upstream_status(
                status.as_u16(),
                format!("Upstream API error on {}: {}", path, body),
            ));
        }

        response.json().await.map_err(|e| {
            SaucierError::upstream_unreachable(format!(
                "Failed to parse upstream response from {}: {}",
                path, e
            ))
        })
    }
}
