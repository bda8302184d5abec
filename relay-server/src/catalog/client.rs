//! HTTP catalog client
//!
//! Thin reqwest wrapper: joins endpoint paths onto the configured base URL,
//! attaches query parameters and optional bearer token, and turns the
//! response into JSON or a [`CatalogError`].

use async_trait::async_trait;
use relay_common::config::CatalogConfig;
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{CatalogApi, CatalogError};

/// Catalog API client
///
/// Cheap to share: `reqwest::Client` pools connections internally, and
/// concurrent `fetch` calls do not coordinate with each other.
pub struct CatalogClient {
    http_client: Client,
    base_url: Url,
    bearer_token: Option<String>,
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: parse_base_url(&config.base_url)?,
            bearer_token: config.bearer_token.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve `endpoint` below the base URL
    ///
    /// A leading slash is ignored, so `"/search"` and `"search"` both stay
    /// under the base path instead of replacing it.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url, CatalogError> {
        self.base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(|e| CatalogError::InvalidUrl(format!("{}: {}", endpoint, e)))
    }
}

/// Parse the base URL, forcing a trailing slash so `Url::join` appends
fn parse_base_url(raw: &str) -> Result<Url, CatalogError> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    let url = Url::parse(&normalized)
        .map_err(|e| CatalogError::InvalidUrl(format!("{}: {}", raw, e)))?;
    if url.cannot_be_a_base() {
        return Err(CatalogError::InvalidUrl(format!("{}: not a base URL", raw)));
    }
    Ok(url)
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn fetch(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value, CatalogError> {
        let url = self.endpoint_url(endpoint)?;

        debug!(url = %url, ?query, "Querying catalog API");

        let mut request = self.http_client.get(url).query(query);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }
}
