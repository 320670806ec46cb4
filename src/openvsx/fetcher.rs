//! Transport seam for the registry lookup

use std::time::Duration;

#[cfg(test)]
use mockall::automock;
use tracing::debug;

use crate::config::RegistryConfig;
use crate::openvsx::error::LookupError;

/// Raw HTTP response handed back by a [`JsonFetcher`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Performs a single GET request for a JSON document
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait JsonFetcher: Send + Sync {
    /// Fetches `url` without a request body
    ///
    /// # Returns
    /// * `Ok(HttpResponse)` - Any response that reached us, whatever its status
    /// * `Err(LookupError::Network)` - If the registry could not be reached
    async fn get(&self, url: &str) -> Result<HttpResponse, LookupError>;
}

/// [`JsonFetcher`] backed by a shared `reqwest::Client`
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    pub fn from_config(config: &RegistryConfig) -> Result<Self, LookupError> {
        Self::new(
            &config.user_agent,
            Duration::from_millis(config.timeout_ms),
        )
    }
}

#[async_trait::async_trait]
impl JsonFetcher for ReqwestFetcher {
    async fn get(&self, url: &str) -> Result<HttpResponse, LookupError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpResponse { status, body })
    }
}
