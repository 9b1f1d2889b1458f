//! reqwest-backed [`SearchTransport`] for Elasticsearch-compatible clusters.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use esquery_core::ConnectionConfig;

use crate::error::SearchError;
use crate::query::QueryPayload;
use crate::response::{ApiErrorBody, ClusterInfo, SearchResponse};
use crate::transport::SearchTransport;

/// HTTP client for one cluster endpoint.
pub struct ElasticClient {
    base_url: String,
    credentials: Option<(String, String)>,
    http: reqwest::Client,
}

impl ElasticClient {
    /// Client for `config.base_url()`.
    pub fn new(config: &ConnectionConfig) -> Result<Self, SearchError> {
        Self::with_base_url(&config.base_url(), config)
    }

    /// Client for an explicit base URL, keeping credentials and timeout from `config`.
    pub fn with_base_url(base_url: &str, config: &ConnectionConfig) -> Result<Self, SearchError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.get()))
            .build()?;
        let credentials = config
            .credentials()
            .map(|(user, pass)| (user.to_string(), pass.to_string()));

        info!(
            url = %base_url,
            authenticated = credentials.is_some(),
            "ElasticClient initialised"
        );

        Ok(Self {
            base_url,
            credentials,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            Some((user, pass)) => request.basic_auth(user, Some(pass)),
            None => request,
        }
    }

    /// Send, reject non-2xx answers, decode the body.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, SearchError> {
        let resp = self.authorize(request).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }

        debug!(status = status.as_u16(), bytes = body.len(), "Cluster answered");
        Ok(serde_json::from_str(&body)?)
    }
}

/// Prefer the structured `error.type`/`error.reason`, fall back to the raw body.
fn api_error(status: u16, body: &str) -> SearchError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => SearchError::Api {
            status,
            error_type: parsed.error.error_type,
            reason: parsed.error.reason,
        },
        Err(_) => SearchError::Http {
            status,
            body: body.trim().to_string(),
        },
    }
}

#[async_trait]
impl SearchTransport for ElasticClient {
    async fn info(&self) -> Result<ClusterInfo, SearchError> {
        let url = format!("{}/", self.base_url);
        debug!(url = %url, "Fetching cluster info");
        self.send(self.http.get(&url)).await
    }

    async fn search(
        &self,
        index: &str,
        payload: &QueryPayload,
        size: usize,
    ) -> Result<SearchResponse, SearchError> {
        let url = format!("{}/{}/_search", self.base_url, index);
        let size = size.to_string();
        debug!(url = %url, query = %payload.text(), size = %size, "Searching");

        let request = self
            .http
            .post(&url)
            .query(&[
                ("track_total_hits", "true"),
                ("pretty", "true"),
                ("size", size.as_str()),
            ])
            .json(payload);

        self.send(request).await
    }
}
