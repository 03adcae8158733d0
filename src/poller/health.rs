//! HTTP client for the backend health endpoint

use super::types::MetricsSnapshot;
use super::HealthSource;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Health fetch errors
#[derive(Debug, thiserror::Error)]
pub enum HealthError {
    #[error("health request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("health endpoint returned {0}")]
    Status(StatusCode),
    #[error("malformed health payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Client for `GET {base_url}/health`
pub struct HealthClient {
    url: String,
    client: Client,
}

impl HealthClient {
    /// Create a client for the given health URL
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, HealthError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Create a client from the loaded configuration
    pub fn from_config(config: &crate::config::Config) -> Result<Self, HealthError> {
        Self::new(config.backend.health_url(), config.poller.request_timeout())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch one snapshot
    pub async fn fetch_snapshot(&self) -> Result<MetricsSnapshot, HealthError> {
        tracing::trace!(url = %self.url, "Polling health endpoint");

        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HealthError::Status(status));
        }

        let body = response.bytes().await?;
        let snapshot = serde_json::from_slice(&body)?;
        Ok(snapshot)
    }
}

#[async_trait]
impl HealthSource for HealthClient {
    async fn fetch(&self) -> Result<MetricsSnapshot, HealthError> {
        self.fetch_snapshot().await
    }
}
