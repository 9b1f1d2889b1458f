use async_trait::async_trait;

use crate::error::SearchError;
use crate::query::QueryPayload;
use crate::response::{ClusterInfo, SearchResponse};

/// The two calls a check makes against the cluster.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// Cluster banner (`GET /`), used for the version check.
    async fn info(&self) -> Result<ClusterInfo, SearchError>;

    /// Run `payload` against `index`, tracking the exact total and returning
    /// at most `size` ranked hits.
    async fn search(
        &self,
        index: &str,
        payload: &QueryPayload,
        size: usize,
    ) -> Result<SearchResponse, SearchError>;
}
