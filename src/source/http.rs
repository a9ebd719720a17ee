use super::RemoteSource;
use crate::config::CatalogConfig;
use crate::errors::{CatalogError, CatalogResult};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::future::Future;
use tracing::debug;

/// `RemoteSource` backed by a pooled HTTP client.
///
/// The request timeout from the config bounds every call, so a stalled upstream
/// surfaces as `Unavailable` instead of stalling the resolution forever.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new(config: &CatalogConfig) -> CatalogResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| CatalogError::unavailable(config.base_url.clone(), e))?;
        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> CatalogResult<Value> {
        debug!(url, "fetching");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::unavailable(url, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::not_found(url));
        }
        if !status.is_success() {
            return Err(CatalogError::unavailable(url, format!("HTTP {}", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CatalogError::unavailable(url, e))?;
        serde_json::from_slice(&body).map_err(|e| CatalogError::malformed(url, e))
    }
}

impl RemoteSource for HttpSource {
    fn fetch(&self, url: &str) -> impl Future<Output = CatalogResult<Value>> + Send {
        self.get(url)
    }
}
