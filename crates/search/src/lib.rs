pub mod check;
pub mod client;
pub mod error;
pub mod extract;
pub mod query;
pub mod response;
pub mod transport;

pub use check::{check_version, run_check, CLIENT_MAJOR_VERSION};
pub use client::ElasticClient;
pub use error::SearchError;
pub use extract::{extract, Extraction};
pub use query::{build_query, exclusion_clause, QueryPayload};
pub use response::{ClusterInfo, ClusterVersion, Hit, HitsEnvelope, SearchResponse, TotalHits};
pub use transport::SearchTransport;
